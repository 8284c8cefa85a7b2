/// Sort direction of one order-by entry.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn is_desc(self) -> bool {
        matches!(self, Self::Desc)
    }
}
