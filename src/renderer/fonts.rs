//! Font loading

use anyhow::bail;
use femtovg::{Canvas, FontId, renderer::OpenGl};

/// Load a proportional UI font plus fallbacks for accents and symbols
pub fn load_fonts(canvas: &mut Canvas<OpenGl>) -> anyhow::Result<Vec<FontId>> {
    let mut fonts = Vec::new();

    let sans_paths = [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/ubuntu/Ubuntu-R.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/System/Library/Fonts/Helvetica.ttc",
        "C:\\Windows\\Fonts\\segoeui.ttf",
    ];

    for path in &sans_paths {
        if let Ok(font) = canvas.add_font(path) {
            fonts.push(font);
            break;
        }
    }

    // Emoji and wide-coverage fallbacks
    let fallback_paths = [
        "/usr/share/fonts/truetype/noto/NotoColorEmoji.ttf",
        "/usr/share/fonts/truetype/droid/DroidSansFallbackFull.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    ];

    for path in &fallback_paths {
        if let Ok(font) = canvas.add_font(path) {
            fonts.push(font);
        }
    }

    if fonts.is_empty() {
        if let Ok(entries) = std::fs::read_dir("/usr/share/fonts/truetype") {
            'search: for entry in entries.flatten() {
                let Ok(sub_entries) = std::fs::read_dir(entry.path()) else {
                    continue;
                };
                for sub_entry in sub_entries.flatten() {
                    let path = sub_entry.path();
                    if path.extension().is_some_and(|e| e == "ttf") {
                        if let Ok(font) = canvas.add_font(&path) {
                            fonts.push(font);
                            break 'search;
                        }
                    }
                }
            }
        }
    }

    if fonts.is_empty() {
        bail!("no usable font found; install dejavu-fonts or liberation-fonts");
    }
    tracing::debug!("Loaded {} fonts", fonts.len());
    Ok(fonts)
}
