//! Interned cell styles

use super::Style;
use ahash::AHashMap;

/// Interning table for [`Style`] values
///
/// A propagated row shares every style with its template row, so cells keep
/// a `u32` handle and the table holds one copy per distinct style. Handle 0
/// is always the default style.
#[derive(Debug, Clone)]
pub struct StylePool {
    styles: Vec<Style>,
    handles: AHashMap<Style, u32>,
}

impl StylePool {
    pub fn new() -> Self {
        let default = Style::default();
        let mut handles = AHashMap::new();
        handles.insert(default.clone(), 0);
        Self {
            styles: vec![default],
            handles,
        }
    }

    /// Handle for `style`, adding it on first sight
    pub fn intern(&mut self, style: &Style) -> u32 {
        if let Some(&handle) = self.handles.get(style) {
            return handle;
        }
        let handle = self.styles.len() as u32;
        self.styles.push(style.clone());
        self.handles.insert(style.clone(), handle);
        handle
    }

    pub fn get(&self, handle: u32) -> Option<&Style> {
        self.styles.get(handle as usize)
    }

    /// The style behind handle 0
    pub fn default_style(&self) -> &Style {
        &self.styles[0]
    }

    /// Distinct styles, the default included
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// True while only the default style is present
    pub fn is_empty(&self) -> bool {
        self.styles.len() == 1
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{BorderEdge, BorderSide};

    #[test]
    fn test_fresh_pool_holds_default() {
        let pool = StylePool::new();
        assert!(pool.is_empty());
        assert_eq!(pool.get(0), Some(&Style::default()));
        assert_eq!(pool.get(1), None);
    }

    #[test]
    fn test_template_rows_share_handles() {
        let mut pool = StylePool::new();
        let template = Style::new()
            .number_format("#,##0.00")
            .with_border(BorderSide::Left, BorderEdge::thin());

        let first = pool.intern(&template);
        let copied = pool.intern(&template.clone());
        let header = pool.intern(&Style::new().bold(true));

        assert_eq!(first, copied);
        assert_ne!(first, header);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.intern(&Style::default()), 0);
    }
}
