use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Instant;

use polars::prelude::*;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::domain::AppError;
use crate::table::{CellValue, Column, ColumnType, DataSet, Table};

const MILLIS_PER_DAY: i64 = 86_400_000;

#[derive(Debug, Clone, Copy, PartialEq)]
enum FileType {
    CSV,
    PARQUET,
    ARROW,
}

#[derive(Debug)]
struct FileInfo {
    path: PathBuf,
    file_size: u64,
    file_type: FileType,
}

/// Loads every file as its own series.
pub fn load_data_set(paths: &[PathBuf]) -> Result<DataSet, AppError> {
    let series = paths
        .iter()
        .map(|p| load_table(p))
        .collect::<Result<Vec<Table>, AppError>>()?;
    Ok(DataSet::new(series))
}

pub fn load_table(path: &Path) -> Result<Table, AppError> {
    let file_info = get_file_info(path.to_path_buf())?;
    debug!(
        "Loading {} ({:?}, {} bytes)",
        file_info.path.display(),
        file_info.file_type,
        file_info.file_size
    );
    let frame = match file_info.file_type {
        FileType::CSV => load_csv(&file_info.path)?,
        FileType::PARQUET => load_parquet(&file_info.path)?,
        FileType::ARROW => load_arrow(&file_info.path)?,
    };

    let start_time = Instant::now();
    let df = frame.collect()?;
    let name = file_info
        .path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("???")
        .to_string();
    let table = table_from_frame(name, &df)?;

    let data_loading_duration = start_time.elapsed().as_millis();
    info!(
        "Loaded {} columns x {} rows in {data_loading_duration}ms",
        table.columns.len(),
        table.row_count()
    );
    Ok(table)
}

/// Converts a collected frame, one column per rayon task.
pub fn table_from_frame(name: impl Into<String>, df: &DataFrame) -> Result<Table, PolarsError> {
    let columns: Result<Vec<Column>, _> = df
        .get_column_names()
        .par_iter()
        .map(|name| load_column(df, name))
        .collect();
    let columns = columns?;
    for c in columns.iter() {
        debug!("Column: {}", c.as_string());
    }
    Ok(Table::named(name, columns))
}

fn column_type(dtype: &DataType) -> ColumnType {
    match dtype {
        DataType::Datetime(_, _) | DataType::Date => ColumnType::Time,
        dt if is_numeric_type(dt) => ColumnType::Number,
        DataType::String => ColumnType::Text,
        _ => ColumnType::Other,
    }
}

fn is_integer_type(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

fn is_numeric_type(dtype: &DataType) -> bool {
    is_integer_type(dtype) || matches!(dtype, DataType::Float32 | DataType::Float64)
}

fn load_column(df: &DataFrame, col_name: &str) -> Result<Column, PolarsError> {
    let column = df.column(col_name)?;
    let dtype = column.dtype().clone();
    let kind = column_type(&dtype);

    let values: Vec<CellValue> = match &dtype {
        DataType::Datetime(unit, _) => {
            let divisor = match unit {
                TimeUnit::Nanoseconds => 1_000_000,
                TimeUnit::Microseconds => 1_000,
                TimeUnit::Milliseconds => 1,
            };
            let raw = column.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, |v| CellValue::Time(v / divisor)))
                .collect()
        }
        DataType::Date => {
            let raw = column.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, |days| CellValue::Time(days * MILLIS_PER_DAY)))
                .collect()
        }
        dt if is_integer_type(dt) => {
            let raw = column.cast(&DataType::Int64)?;
            raw.i64()?
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Int))
                .collect()
        }
        DataType::Float32 | DataType::Float64 => {
            let raw = column.cast(&DataType::Float64)?;
            raw.f64()?
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, CellValue::Float))
                .collect()
        }
        DataType::Boolean => column
            .bool()?
            .into_iter()
            .map(|v| v.map_or(CellValue::Null, CellValue::Bool))
            .collect(),
        _ => {
            let raw = column.cast(&DataType::String)?;
            raw.str()?
                .into_iter()
                .map(|v| v.map_or(CellValue::Null, |s| CellValue::Text(s.to_string())))
                .collect()
        }
    };

    Ok(Column::new(col_name, kind, values))
}

fn detect_file_type(path: &Path) -> Result<FileType, AppError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::CSV),
        Some("PARQUET") | Some("PQ") => Ok(FileType::PARQUET),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::ARROW),
        _ => Err(AppError::UnknownFileType(path.to_path_buf())),
    }
}

fn get_file_info(path: PathBuf) -> Result<FileInfo, AppError> {
    let metadata = fs::metadata(&path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => AppError::FileNotFound(path.clone()),
        ErrorKind::PermissionDenied => AppError::PermissionDenied(path.clone()),
        _ => AppError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(AppError::LoadingFailed(format!(
            "{} is not a file",
            path.display()
        )));
    }

    let file_size = metadata.len();
    let file_type = detect_file_type(&path)?;

    Ok(FileInfo {
        path,
        file_size,
        file_type,
    })
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .with_try_parse_dates(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}
