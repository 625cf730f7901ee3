/// Resolved `$top` / `$skip` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub top: u32,
    pub skip: u64,
}

impl Page {
    /// Missing `top` means a full page, an oversized one is cut down to
    /// `max`. Nothing is ever rejected. A negative `top` becomes 0, since
    /// SQLite reads a negative LIMIT as no limit at all.
    pub fn resolve(top: Option<i64>, skip: Option<i64>, max: u32) -> Self {
        let top = match top {
            None => max,
            Some(t) if t < 0 => 0,
            Some(t) => u32::try_from(t).unwrap_or(u32::MAX).min(max),
        };
        let skip = skip.map_or(0, |s| u64::try_from(s).unwrap_or(0));
        Self { top, skip }
    }

    pub fn apply(&self, sql: &str) -> String {
        format!("{sql} LIMIT {} OFFSET {}", self.top, self.skip)
    }

    /// Zero-based page number for envelopes.
    pub fn number(&self) -> u64 {
        if self.top == 0 { 0 } else { self.skip / u64::from(self.top) }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(Some(5000), None, 1000, 0)]
    #[case(None, None, 1000, 0)]
    #[case(Some(20), Some(40), 20, 40)]
    #[case(Some(1000), Some(0), 1000, 0)]
    #[case(Some(-3), Some(-9), 0, 0)]
    #[case(Some(i64::MAX), Some(7), 1000, 7)]
    fn resolves_within_bounds(
        #[case] top: Option<i64>,
        #[case] skip: Option<i64>,
        #[case] want_top: u32,
        #[case] want_skip: u64,
    ) {
        assert_eq!(Page::resolve(top, skip, 1000), Page { top: want_top, skip: want_skip });
    }

    #[test]
    fn appends_limit_and_offset() {
        let page = Page::resolve(Some(10), Some(30), 1000);
        assert_eq!(page.apply("SELECT * FROM chats"), "SELECT * FROM chats LIMIT 10 OFFSET 30");
        assert_eq!(page.number(), 3);
    }
}
