/// First-seen numbering of temporary and working slot tokens.
///
/// A table belongs to exactly one disassembly pass over one op array: tokens
/// are only meaningful inside the array that produced them, so the type is
/// neither `Clone` nor `Default` and [`disassemble`](crate::disassemble)
/// builds a fresh one per call.
#[derive(Debug)]
pub struct SlotTable {
    tokens: Vec<i64>,
}

impl SlotTable {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self { tokens: Vec::new() }
    }

    /// Dense id for `token`: its position in first-seen order.
    ///
    /// Linear scan. Op arrays hold a few hundred instructions at most and the
    /// numbering must follow encounter order, not token order.
    pub fn name(&mut self, token: i64) -> u32 {
        if let Some(id) = self.tokens.iter().position(|&t| t == token) {
            return id as u32;
        }
        self.tokens.push(token);
        (self.tokens.len() - 1) as u32
    }

    /// Number of distinct tokens seen so far.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
