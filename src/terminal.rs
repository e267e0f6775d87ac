//! Terminal rendition of the page surface used by the binary.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use fitfolio::payload::ImagePayload;
use fitfolio::ui::{ElementNotFound, GalleryView, Surface};

/// Every element exists; fields live in memory, everything visible goes to
/// stdout and alerts go to stderr.
#[derive(Default)]
pub struct TerminalSurface {
    fields: Mutex<HashMap<String, String>>,
}

impl TerminalSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for TerminalSurface {
    fn field_value(&self, id: &str) -> Result<String, ElementNotFound> {
        let fields = self.fields.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(fields.get(id).cloned().unwrap_or_default())
    }

    fn set_field_value(&self, id: &str, value: &str) -> Result<(), ElementNotFound> {
        self.fields
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_owned(), value.to_owned());
        Ok(())
    }

    fn render_gallery(&self, view: &GalleryView) -> Result<(), ElementNotFound> {
        match view {
            GalleryView::Placeholder(message) => println!("{message}"),
            GalleryView::Tiles(tiles) => {
                for tile in tiles {
                    println!(
                        "[{}] {}  {}  {} bytes",
                        tile.index,
                        tile.alt,
                        tile.payload.mime().unwrap_or("?"),
                        tile.payload.as_str().len()
                    );
                }
            }
        }
        Ok(())
    }

    fn show_modal(&self, image: Option<&ImagePayload>) -> Result<(), ElementNotFound> {
        if let Some(image) = image {
            println!("{}", image.as_str());
        }
        Ok(())
    }

    fn alert(&self, message: &str) {
        eprintln!("{message}");
    }

    fn navigate(&self, page: &str) {
        tracing::info!(page, "navigate");
    }
}
