use std::path::PathBuf;

pub struct FileSizeUtils;

impl FileSizeUtils {
    pub fn format_size(size: u64) -> String {
        const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// "3 files, 2.40 MB". Unreadable files count as zero bytes.
    pub fn summarize(files: &[PathBuf]) -> String {
        let total: u64 = files
            .iter()
            .filter_map(|f| std::fs::metadata(f).ok())
            .map(|m| m.len())
            .sum();
        let noun = if files.len() == 1 { "file" } else { "files" };
        format!("{} {}, {}", files.len(), noun, Self::format_size(total))
    }
}
