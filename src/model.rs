use std::time::{Duration, Instant};

use arboard::Clipboard;
use tracing::{debug, trace};

use dynimg::domain::{HELP_TEXT, Message};
use dynimg::render::{Layout, Panel, Placeholder};

#[derive(Debug, PartialEq)]
pub enum Status {
    READY,
    QUITTING,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Modus {
    TABLE,
    POPUP,
}

struct Slideshow {
    duration: Duration,
    infinite: bool,
    last_switch: Instant,
}

/// Everything the ui needs for one frame.
pub struct UIData {
    pub title: String,
    pub header: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
    pub selected_row: usize,
    pub placeholder: Option<Placeholder>,
    pub show_popup: bool,
    pub popup_message: String,
    pub status_message: String,
}

pub struct Model {
    pub status: Status,
    modus: Modus,
    name: String,
    panel: Result<Panel, Placeholder>,
    curser_row: usize,
    slideshow: Option<Slideshow>,
    clipboard: Option<Clipboard>,
    page_size: usize,
    popup_message: String,
    status_message: String,
}

impl Model {
    pub fn init(name: impl Into<String>, panel: Result<Panel, Placeholder>) -> Self {
        let slideshow = match &panel {
            Ok(Panel {
                layout: Layout::Slideshow(s),
                ..
            }) => Some(Slideshow {
                duration: Duration::from_millis(s.duration),
                infinite: s.infinite,
                last_switch: Instant::now(),
            }),
            _ => None,
        };
        let status_message = match &panel {
            Ok(p) => format!("{} images, {}", p.images.len(), Self::layout_label(&p.layout)),
            Err(p) => p.message.clone(),
        };
        Model {
            status: Status::READY,
            modus: Modus::TABLE,
            name: name.into(),
            panel,
            curser_row: 0,
            slideshow,
            clipboard: None,
            page_size: 10,
            popup_message: String::new(),
            status_message,
        }
    }

    fn layout_label(layout: &Layout) -> String {
        match layout {
            Layout::Single => "single fill".to_string(),
            Layout::Grid { width, height } => format!("grid {width}x{height}px"),
            Layout::Slideshow(s) => format!("slideshow every {}ms", s.duration),
        }
    }

    fn image_count(&self) -> usize {
        self.panel.as_ref().map_or(0, |p| p.images.len())
    }

    pub fn selected(&self) -> usize {
        self.curser_row
    }

    pub fn get_uidata(&self) -> UIData {
        let (rows, placeholder) = match &self.panel {
            Ok(panel) => (
                panel
                    .images
                    .iter()
                    .map(|d| {
                        vec![
                            d.icon_url.clone(),
                            d.alt.clone(),
                            d.tooltip.clone(),
                            d.overlay_color.clone().unwrap_or_default(),
                            d.underline_text.clone().unwrap_or_default(),
                            d.link_url.clone().unwrap_or_default(),
                        ]
                    })
                    .collect(),
                None,
            ),
            Err(p) => (Vec::new(), Some(p.clone())),
        };
        UIData {
            title: format!(" {} ", self.name),
            header: vec!["url", "alt", "tooltip", "overlay", "underline", "link"],
            rows,
            selected_row: self.curser_row,
            placeholder,
            show_popup: self.modus == Modus::POPUP,
            popup_message: self.popup_message.clone(),
            status_message: self.status_message.clone(),
        }
    }

    pub fn update(&mut self, message: Option<Message>) {
        let Some(msg) = message else {
            return;
        };
        match self.modus {
            Modus::TABLE => match msg {
                Message::Quit => self.quit(),
                Message::MoveDown => self.move_selection_down(1),
                Message::MoveUp => self.move_selection_up(1),
                Message::MovePageDown => self.move_selection_down(self.page_size),
                Message::MovePageUp => self.move_selection_up(self.page_size),
                Message::MoveBeginning => self.select(0),
                Message::MoveEnd => self.select(self.image_count().saturating_sub(1)),
                Message::CopyUrl => self.copy_selected(false),
                Message::CopyLink => self.copy_selected(true),
                Message::Help => self.show_help(),
                Message::Tick => self.advance_slideshow(),
                Message::Resize(_, height) => self.resize(height),
                Message::Exit => {}
            },
            Modus::POPUP => match msg {
                Message::Quit => self.quit(),
                Message::Exit => self.exit(),
                Message::Resize(_, height) => self.resize(height),
                _ => (),
            },
        }
    }

    pub fn quit(&mut self) {
        self.status = Status::QUITTING;
    }

    fn exit(&mut self) {
        if self.modus == Modus::POPUP {
            trace!("Close popup ...");
            self.modus = Modus::TABLE;
        }
    }

    fn show_help(&mut self) {
        self.popup_message = HELP_TEXT.to_string();
        self.modus = Modus::POPUP;
    }

    fn resize(&mut self, height: usize) {
        self.page_size = height.saturating_sub(4).max(1);
        trace!("UI was resized, page size {}", self.page_size);
    }

    fn select(&mut self, row: usize) {
        if let Some(slideshow) = self.slideshow.as_mut() {
            slideshow.last_switch = Instant::now();
        }
        self.curser_row = row.min(self.image_count().saturating_sub(1));
    }

    fn move_selection_up(&mut self, size: usize) {
        self.select(self.curser_row.saturating_sub(size));
    }

    fn move_selection_down(&mut self, size: usize) {
        self.select(self.curser_row + size);
    }

    fn advance_slideshow(&mut self) {
        let count = self.image_count();
        let Some(slideshow) = self.slideshow.as_mut() else {
            return;
        };
        if count == 0 || slideshow.last_switch.elapsed() < slideshow.duration {
            return;
        }
        slideshow.last_switch = Instant::now();
        if self.curser_row + 1 < count {
            self.curser_row += 1;
        } else if slideshow.infinite {
            self.curser_row = 0;
        }
        debug!("Slideshow at image {}", self.curser_row);
    }

    fn copy_selected(&mut self, link: bool) {
        let Ok(panel) = &self.panel else {
            return;
        };
        let Some(image) = panel.images.get(self.curser_row) else {
            return;
        };
        let text = if link {
            match &image.link_url {
                Some(url) => url.clone(),
                None => {
                    self.status_message = "No link for this image".to_string();
                    return;
                }
            }
        } else {
            image.icon_url.clone()
        };
        trace!("Copy: {}", text);

        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(c) => self.clipboard = Some(c),
                Err(e) => {
                    self.status_message = format!("Clipboard unavailable: {e}");
                    return;
                }
            }
        }
        if let Some(clipboard) = self.clipboard.as_mut() {
            self.status_message = match clipboard.set_text(text) {
                Ok(_) => "Copied to clipboard".to_string(),
                Err(e) => format!("Error copying to clipboard: {e}"),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dynimg::config::SlideshowOptions;
    use dynimg::domain::RenderError;
    use dynimg::projector::ImageDescriptor;
    use dynimg::render::Features;

    fn panel(images: usize, layout: Layout) -> Panel {
        Panel {
            layout,
            features: Features {
                tooltip: false,
                overlay: None,
                underline_text_size: None,
                link_new_tab: None,
            },
            images: (0..images)
                .map(|i| ImageDescriptor {
                    icon_url: format!("/{i}.png"),
                    alt: i.to_string(),
                    tooltip: String::new(),
                    overlay_color: None,
                    underline_text: None,
                    underline_color: None,
                    link_url: None,
                })
                .collect(),
        }
    }

    fn grid() -> Layout {
        Layout::Grid {
            width: 75,
            height: 75,
        }
    }

    #[test]
    fn selection_stays_in_bounds() {
        let mut model = Model::init("t", Ok(panel(3, grid())));
        model.update(Some(Message::MoveUp));
        assert_eq!(model.selected(), 0);
        model.update(Some(Message::MovePageDown));
        assert_eq!(model.selected(), 2);
        model.update(Some(Message::MoveBeginning));
        assert_eq!(model.selected(), 0);
        model.update(Some(Message::MoveEnd));
        assert_eq!(model.selected(), 2);
    }

    #[test]
    fn placeholder_is_shown_for_errors() {
        let err = RenderError::MultipleSeries(2);
        let model = Model::init("t", Err(Placeholder::from(&err)));
        let data = model.get_uidata();
        assert!(data.rows.is_empty());
        assert_eq!(data.placeholder.unwrap().message, err.placeholder());
    }

    #[test]
    fn help_popup_and_exit() {
        let mut model = Model::init("t", Ok(panel(2, grid())));
        model.update(Some(Message::Help));
        assert!(model.get_uidata().show_popup);
        model.update(Some(Message::MoveDown));
        assert_eq!(model.selected(), 0);
        model.update(Some(Message::Exit));
        assert!(!model.get_uidata().show_popup);
        model.update(Some(Message::Quit));
        assert_eq!(model.status, Status::QUITTING);
    }

    #[test]
    fn slideshow_rotates_and_wraps() {
        let options = SlideshowOptions {
            enable: true,
            duration: 0,
            ..Default::default()
        };
        let mut model = Model::init("t", Ok(panel(2, Layout::Slideshow(options))));
        model.update(Some(Message::Tick));
        assert_eq!(model.selected(), 1);
        model.update(Some(Message::Tick));
        assert_eq!(model.selected(), 0);
    }

    #[test]
    fn grid_ignores_ticks() {
        let mut model = Model::init("t", Ok(panel(2, grid())));
        model.update(Some(Message::Tick));
        assert_eq!(model.selected(), 0);
    }

    #[test]
    fn copy_link_without_link_reports() {
        let mut model = Model::init("t", Ok(panel(1, Layout::Single)));
        model.update(Some(Message::CopyLink));
        assert_eq!(model.get_uidata().status_message, "No link for this image");
    }
}
