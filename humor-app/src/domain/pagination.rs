use serde::{Deserialize, Serialize};

/// 1-indexed page number. Anything below 1 is read as the first page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct PageNumber(u32);

impl From<u32> for PageNumber {
    fn from(page: u32) -> Self {
        Self::new(page)
    }
}

impl From<PageNumber> for u32 {
    fn from(page: PageNumber) -> Self {
        page.0
    }
}

impl PageNumber {
    pub const FIRST: PageNumber = PageNumber(1);

    pub fn new(page: u32) -> Self {
        Self(page.max(1))
    }

    /// Reads a `?page=` value. Missing, non-numeric or non-positive values
    /// fall back to the first page.
    pub fn from_query(raw: Option<&str>) -> Self {
        raw.and_then(|s| s.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .map(|p| Self(u32::try_from(p).unwrap_or(u32::MAX)))
            .unwrap_or(Self::FIRST)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn window(self, size: u64) -> PageWindow {
        let size = size.max(1);
        PageWindow {
            offset: u64::from(self.0.saturating_sub(1)) * size,
            size,
        }
    }
}

impl Default for PageNumber {
    fn default() -> Self {
        Self::FIRST
    }
}

/// Offset/limit pair for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub offset: u64,
    pub size: u64,
}

impl PageWindow {
    pub fn total_pages(&self, total: u64) -> u64 {
        total.div_ceil(self.size).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_query_normalises() {
        assert_eq!(PageNumber::from_query(None).get(), 1);
        assert_eq!(PageNumber::from_query(Some("3")).get(), 3);
        assert_eq!(PageNumber::from_query(Some("0")).get(), 1);
        assert_eq!(PageNumber::from_query(Some("-4")).get(), 1);
        assert_eq!(PageNumber::from_query(Some("abc")).get(), 1);
        assert_eq!(PageNumber::new(0), PageNumber::FIRST);
    }

    #[test]
    fn test_window() {
        let window = PageNumber::new(3).window(12);
        assert_eq!(window.offset, 24);
        assert_eq!(window.size, 12);
        assert_eq!(window.total_pages(0), 1);
        assert_eq!(window.total_pages(24), 2);
        assert_eq!(window.total_pages(25), 3);
    }

    #[test]
    fn test_deserialize_clamps_to_first_page() {
        let page: PageNumber = serde_json::from_str("0").unwrap();
        assert_eq!(page, PageNumber::FIRST);
        assert_eq!(page.window(12).offset, 0);

        let page: PageNumber = serde_json::from_str("4").unwrap();
        assert_eq!(page.get(), 4);
        assert_eq!(serde_json::to_string(&page).unwrap(), "4");
    }
}
