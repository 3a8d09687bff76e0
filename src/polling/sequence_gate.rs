/// Last-applied sequence number of one cycle. A result is applied only if it
/// was requested after the one applied before it, so a slow response can
/// never overwrite fresher data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceGate {
    last_applied: Option<u64>,
}

impl SequenceGate {
    /// Record `seq` as applied if it is newer than anything applied so far.
    pub fn accept(&mut self, seq: u64) -> bool {
        match self.last_applied {
            Some(last) if seq <= last => false,
            _ => {
                self.last_applied = Some(seq);
                true
            }
        }
    }

    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }
}
