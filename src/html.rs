use crate::projector::ImageDescriptor;
use crate::render::{Features, Layout, Panel, Placeholder};

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn placeholder_html(placeholder: &Placeholder) -> String {
    format!(
        "<div class=\"panel-empty\">\n  <p>{}</p>\n</div>\n",
        escape(&placeholder.message)
    )
}

fn image_html(out: &mut String, image: &ImageDescriptor, features: &Features, style: &str) {
    let link = image.link_url.as_ref().zip(features.link_new_tab);
    if let Some((url, new_tab)) = link {
        let target = if new_tab { " target=\"_blank\"" } else { "" };
        out.push_str(&format!("<a href=\"{}\"{target}>", escape(url)));
    }
    out.push_str("<div class=\"image-container\">");

    out.push_str(&format!(
        "<img src=\"{}\" alt=\"{}\"",
        escape(&image.icon_url),
        escape(&image.alt)
    ));
    if !style.is_empty() {
        out.push_str(&format!(" style=\"{style}\""));
    }
    if features.tooltip {
        out.push_str(&format!(" title=\"{}\"", escape(&image.tooltip)));
    }
    out.push_str("/>");

    if let (Some(overlay), Some(color)) = (&features.overlay, &image.overlay_color) {
        out.push_str(&format!(
            "<div class=\"overlay\" style=\"position: absolute; {} width: {}; height: {}; background-color: {};\"></div>",
            overlay.position.css(),
            overlay.width,
            overlay.height,
            escape(color)
        ));
    }
    if let (Some(size), Some(text)) = (features.underline_text_size, &image.underline_text) {
        let color = image
            .underline_color
            .as_deref()
            .map(|c| format!(" color: {};", escape(c)))
            .unwrap_or_default();
        out.push_str(&format!(
            "<div class=\"underline\" style=\"font-size: {size}px;{color}\">{}</div>",
            escape(text)
        ));
    }

    out.push_str("</div>");
    if link.is_some() {
        out.push_str("</a>");
    }
    out.push('\n');
}

pub fn panel_html(panel: &Panel) -> String {
    let mut out = String::new();
    match &panel.layout {
        Layout::Single => {
            out.push_str("<div class=\"image-container full\">\n");
            if let Some(image) = panel.images.first() {
                image_html(&mut out, image, &panel.features, "");
            }
        }
        Layout::Grid { width, height } => {
            out.push_str("<div class=\"container\">\n");
            let style = format!("width: {width}px; height: {height}px");
            for image in panel.images.iter() {
                image_html(&mut out, image, &panel.features, &style);
            }
        }
        Layout::Slideshow(slideshow) => {
            out.push_str(&format!(
                "<div class=\"slideshow {:?}\" data-duration=\"{}\" data-transition-duration=\"{}\" data-pause-on-hover=\"{}\" data-infinite=\"{}\">\n",
                slideshow.transition,
                slideshow.duration,
                slideshow.transition_duration,
                slideshow.pause_on_hover,
                slideshow.infinite
            ));
            for image in panel.images.iter() {
                image_html(&mut out, image, &panel.features, "");
            }
        }
    }
    out.push_str("</div>\n");
    out
}
