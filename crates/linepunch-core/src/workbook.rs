//! Workbooks: the sheets a snapshot file holds

use crate::error::{Error, Result};
use crate::worksheet::Worksheet;
use crate::MAX_SHEET_NAME_LEN;

/// Characters a sheet name may not contain
const FORBIDDEN_NAME_CHARS: [char; 7] = [':', '\\', '/', '?', '*', '[', ']'];

/// Ordered worksheets plus the index of the active one
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    sheets: Vec<Worksheet>,
    active: usize,
}

impl Workbook {
    /// A workbook with no sheets
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn sheet_count(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }

    pub fn worksheet(&self, index: usize) -> Option<&Worksheet> {
        self.sheets.get(index)
    }

    /// Mutable access that reports a missing sheet as an error
    pub fn sheet_mut(&mut self, index: usize) -> Result<&mut Worksheet> {
        let count = self.sheets.len();
        self.sheets
            .get_mut(index)
            .ok_or(Error::SheetOutOfBounds(index, count))
    }

    pub fn worksheets(&self) -> impl Iterator<Item = &Worksheet> {
        self.sheets.iter()
    }

    pub fn worksheets_mut(&mut self) -> impl Iterator<Item = &mut Worksheet> {
        self.sheets.iter_mut()
    }

    /// Append `sheet`, returning its index
    ///
    /// Names must be non-empty, at most [`MAX_SHEET_NAME_LEN`] characters,
    /// free of `: \ / ? * [ ]` and unique ignoring case.
    pub fn add_existing_worksheet(&mut self, sheet: Worksheet) -> Result<usize> {
        self.check_name(sheet.name())?;
        self.sheets.push(sheet);
        Ok(self.sheets.len() - 1)
    }

    pub fn active_sheet(&self) -> usize {
        self.active
    }

    pub fn set_active_sheet(&mut self, index: usize) -> Result<()> {
        if index >= self.sheets.len() {
            return Err(Error::SheetOutOfBounds(index, self.sheets.len()));
        }
        self.active = index;
        Ok(())
    }

    fn check_name(&self, name: &str) -> Result<()> {
        let invalid = |reason: String| Err(Error::InvalidSheetName(reason));
        if name.is_empty() {
            return invalid("name is empty".to_string());
        }
        if name.chars().count() > MAX_SHEET_NAME_LEN {
            return invalid(format!(
                "'{}' is longer than {} characters",
                name, MAX_SHEET_NAME_LEN
            ));
        }
        if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
            return invalid(format!("'{}' contains '{}'", name, c));
        }
        let lower = name.to_lowercase();
        if self.sheets.iter().any(|s| s.name().to_lowercase() == lower) {
            return Err(Error::DuplicateSheetName(name.to_string()));
        }
        Ok(())
    }
}
