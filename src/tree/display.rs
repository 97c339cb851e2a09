use derive_more::Display;

pub const COLUMN_COUNT: usize = 4;

/// Text shown in the size column of a directory that has not been expanded.
pub const LOADING_TEXT: &str = "Loading...";

const KIB: u64 = 1024;
const MIB: u64 = 1024 * KIB;
const GIB: u64 = 1024 * MIB;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Column {
    #[display("Name")]
    Name,
    #[display("Type")]
    Type,
    #[display("Size")]
    Size,
    #[display("Last Modified")]
    LastModified,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Name,
        Column::Type,
        Column::Size,
        Column::LastModified,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Icon hook for the name column, displayed as its freedesktop theme icon name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Decoration {
    #[display("folder")]
    Folder,
    #[display("text-x-generic")]
    File,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum EntryType {
    #[display("Directory")]
    Directory,
    #[display("File")]
    File,
}

/// Human readable file size.
///
/// Up to and including 1024 the value is shown in bytes. Each larger unit is
/// used once the value is strictly greater than the previous unit's limit,
/// rounded to two decimals with trailing zeros dropped down to one digit.
pub fn format_size(size: u64) -> String {
    if size <= KIB {
        format!("{} B", size)
    } else if size <= MIB {
        format!("{} KB", format_scaled(size, KIB))
    } else if size <= GIB {
        format!("{} MB", format_scaled(size, MIB))
    } else {
        format!("{} GB", format_scaled(size, GIB))
    }
}

fn format_scaled(size: u64, unit: u64) -> String {
    let text = format!("{:.2}", size as f64 / unit as f64);
    match text.strip_suffix('0') {
        Some(trimmed) if !trimmed.ends_with('.') => trimmed.to_string(),
        Some(_) | None => text,
    }
}

pub fn header_text(section: usize) -> Option<String> {
    Column::from_index(section).map(|column| column.to_string())
}
