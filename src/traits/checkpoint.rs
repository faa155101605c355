//! Nested undo frames over a mutable store.

/// A store that can open nested frames and later keep or discard every
/// write made inside them.
///
/// [`checkpoint`](Self::checkpoint) opens a frame and returns its mark.
/// Frames close in LIFO order, each with exactly one
/// [`commit`](Self::commit) or [`rollback`](Self::rollback) passing the
/// mark it was opened with.  Committing an inner frame hands its writes to
/// the enclosing frame, so a later rollback of the outer frame still undoes
/// them.  Implementations should record only what a frame touches, so the
/// cost of a frame is independent of the size of the store.
///
/// # Examples
///
/// ```
/// use hydra_dex::domain::{Address, Amount};
/// use hydra_dex::ledger::InMemoryLedger;
/// use hydra_dex::traits::{AssetLedger, Checkpoint};
///
/// let token = Address::from_bytes([1u8; 20]);
/// let alice = Address::from_bytes([0xA1; 20]);
///
/// let mut ledger = InMemoryLedger::new(Address::from_bytes([0xEE; 20]));
/// let mark = ledger.checkpoint();
/// ledger.mint(token, alice, Amount::new(7)).expect("fits");
/// ledger.rollback(mark);
/// assert_eq!(ledger.balance_of(token, alice), Amount::ZERO);
/// ```
pub trait Checkpoint {
    /// Opens a frame and returns its mark.
    fn checkpoint(&mut self) -> usize;

    /// Closes the frame opened at `mark`, keeping its writes.
    fn commit(&mut self, mark: usize);

    /// Closes the frame opened at `mark`, undoing every write made since.
    fn rollback(&mut self, mark: usize);
}
