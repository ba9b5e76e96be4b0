//! Terminal rendering of version lists and package details

use std::fmt::Write;

use crate::version::manifest::PackumentVersion;

// ANSI escape codes
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const RED_BRIGHT: &str = "\x1b[91m";
const GREEN_BRIGHT: &str = "\x1b[92m";
const YELLOW_BRIGHT: &str = "\x1b[93m";
const MAGENTA_BRIGHT: &str = "\x1b[95m";
const CYAN_BRIGHT: &str = "\x1b[96m";

const INSTALLED_MARK: &str = "✔ ";
const COLUMN_GAP: usize = 2;
const DEFAULT_WIDTH: usize = 80;

/// Applies ANSI styles, or nothing when color is disabled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    fn paint(&self, styles: &[&str], text: &str) -> String {
        if !self.enabled || styles.is_empty() {
            return text.to_string();
        }
        format!("{}{}{}", styles.concat(), text, RESET)
    }

    /// Style for error messages
    pub fn error(&self, text: &str) -> String {
        self.paint(&[RED_BRIGHT], text)
    }
}

/// A styled piece of text and its visible width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub text: String,
    pub width: usize,
}

/// Render one version of the list
///
/// The installed version carries a check mark. Satisfying versions are
/// yellow when the range came from package.json, green when it was given
/// explicitly.
pub fn format_version(
    palette: Palette,
    version: &str,
    installed: bool,
    satisfied: bool,
    local_range: bool,
) -> Cell {
    let satisfied_color = if local_range {
        YELLOW_BRIGHT
    } else {
        GREEN_BRIGHT
    };

    let text = match (installed, satisfied) {
        (true, true) => {
            palette.paint(&[MAGENTA_BRIGHT, BOLD], INSTALLED_MARK)
                + &palette.paint(&[satisfied_color, BOLD], version)
        }
        (true, false) => {
            palette.paint(&[MAGENTA_BRIGHT, BOLD], INSTALLED_MARK)
                + &palette.paint(&[MAGENTA_BRIGHT, BOLD], version)
        }
        (false, true) => palette.paint(&[satisfied_color, BOLD], &format!("  {version}")),
        (false, false) => palette.paint(&[GRAY], &format!("  {version}")),
    };

    Cell {
        text,
        width: version.chars().count() + 2,
    }
}

/// Summarize what the local project knows about a package
pub fn format_local_info(
    palette: Palette,
    package_name: &str,
    local_range: Option<&str>,
    installed_version: Option<&str>,
) -> String {
    let name = palette.paint(&[CYAN, BOLD], package_name);

    if local_range.is_none() && installed_version.is_none() {
        return palette.paint(&[CYAN], "Found ")
            + &name
            + &palette.paint(&[CYAN], " locally with no range or installed version");
    }

    let mut parts = Vec::new();
    if let Some(range) = local_range {
        parts.push(palette.paint(&[CYAN], "range: ") + &palette.paint(&[YELLOW, BOLD], range));
    }
    if let Some(version) = installed_version {
        parts.push(
            palette.paint(&[CYAN], "installed: ")
                + &palette.paint(&[MAGENTA_BRIGHT, BOLD], &format!("{INSTALLED_MARK}{version}")),
        );
    }

    palette.paint(&[CYAN], "Found ")
        + &name
        + &palette.paint(&[CYAN], " locally with ")
        + &parts.join(&palette.paint(&[CYAN], ", "))
}

/// Package name followed by its homepage when known
pub fn format_package_info(palette: Palette, info: &PackumentVersion) -> String {
    let mut line = palette.paint(&[CYAN_BRIGHT, BOLD], &info.name);
    if let Some(homepage) = info.homepage.as_deref().filter(|h| !h.is_empty()) {
        line.push_str(" | ");
        line.push_str(&palette.paint(&[DIM], homepage));
    }
    line
}

/// Lay cells out in columns, filled top to bottom, fitting `width`
pub fn columns(cells: &[Cell], width: usize) -> String {
    if cells.is_empty() {
        return String::new();
    }

    let cell_width = cells.iter().map(|c| c.width).max().unwrap_or(0) + COLUMN_GAP;
    let column_count = (width / cell_width).max(1);
    let row_count = cells.len().div_ceil(column_count);

    let mut output = String::new();
    for row in 0..row_count {
        let mut line = String::new();
        let mut pending_pad = 0;
        for cell in cells.iter().skip(row).step_by(row_count) {
            line.push_str(&" ".repeat(pending_pad));
            line.push_str(&cell.text);
            pending_pad = cell_width - cell.width;
        }
        let _ = writeln!(output, "{line}");
    }
    output
}

/// Width of the terminal from `COLUMNS`, or a conventional default
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|c| c.trim().parse().ok())
        .filter(|&w: &usize| w > 0)
        .unwrap_or(DEFAULT_WIDTH)
}
