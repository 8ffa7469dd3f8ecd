use std::fmt::{Debug, Display};

use log::{debug, info};

use crate::error::SessionError;
use crate::sequencer::{Renderer, Sequencer};
use crate::tree::AvlTree;

/// The live tree, the state it had before the last operation, and the sequencer
/// that shows each operation step by step.
///
/// Every mutating method borrows the session mutably for as long as its steps are
/// playing, so a second operation cannot start while one is still running.
pub struct Session<K, R> {
    tree: AvlTree<K>,
    saved: Option<AvlTree<K>>,
    sequencer: Sequencer<R>,
}

impl<K, R> Session<K, R>
where
    K: Ord + Clone + Debug + Display,
    R: Renderer<K>,
{
    pub fn new(sequencer: Sequencer<R>) -> Self {
        Self { tree: AvlTree::new(), saved: None, sequencer }
    }

    pub fn tree(&self) -> &AvlTree<K> {
        &self.tree
    }

    pub fn sequencer(&self) -> &Sequencer<R> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer<R> {
        &mut self.sequencer
    }

    pub fn can_undo(&self) -> bool {
        self.saved.is_some()
    }

    /// Saves the current tree, inserts `key` and plays the resulting steps.
    ///
    /// The snapshot is taken even when the key turns out to be a duplicate.
    pub async fn insert(&mut self, key: K) -> Result<(), SessionError<K>> {
        self.saved = Some(self.tree.copy());
        let mut steps = Vec::new();
        self.tree.insert(key, &mut steps)?;
        debug!("insert produced {} steps", steps.len());
        self.sequencer.play(steps).await;
        Ok(())
    }

    /// Saves the current tree, removes `key` and plays the resulting steps.
    pub async fn remove(&mut self, key: K) -> Result<(), SessionError<K>> {
        self.saved = Some(self.tree.copy());
        let mut steps = Vec::new();
        self.tree.remove(&key, &mut steps)?;
        debug!("remove produced {} steps", steps.len());
        self.sequencer.play(steps).await;
        Ok(())
    }

    /// Puts back the tree saved before the last operation and redraws it.
    ///
    /// Only one state is kept, so a second undo in a row fails with
    /// [`SessionError::NoSavedState`].
    pub fn undo(&mut self) -> Result<(), SessionError<K>> {
        let saved = self.saved.take().ok_or(SessionError::NoSavedState)?;
        self.tree = saved;
        info!("restored tree with {} keys", self.tree.len());
        self.sequencer.redraw(self.tree.shape());
        Ok(())
    }

    /// Draws the current tree without changing anything.
    pub fn show(&mut self) {
        self.sequencer.redraw(self.tree.shape());
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::error::TreeError;
    use crate::sequencer::{Frame, NullRenderer};

    #[derive(Default)]
    struct Recorder {
        frames: Vec<Frame<char>>,
    }

    impl Renderer<char> for Recorder {
        fn render(&mut self, frame: Frame<char>) {
            self.frames.push(frame);
        }
    }

    fn session() -> Session<char, Recorder> {
        Session::new(Sequencer::new(Recorder::default(), Duration::ZERO))
    }

    #[tokio::test]
    async fn undo_restores_previous_tree() {
        let mut s = session();
        for key in "MFT".chars() {
            s.insert(key).await.unwrap();
        }
        let before = s.tree().copy();

        s.remove('M').await.unwrap();
        assert!(!s.tree().contains(&'M'));
        s.undo().unwrap();
        assert_eq!(s.tree(), &before);
        assert!(!s.can_undo());

        let last = s.sequencer().renderer().frames.last().cloned();
        assert_eq!(last, Some(Frame::Redraw { shape: before.shape() }));
    }

    #[tokio::test]
    async fn only_one_level_of_undo() {
        let mut s = session();
        assert_eq!(s.undo(), Err(SessionError::NoSavedState));
        s.insert('A').await.unwrap();
        s.insert('B').await.unwrap();
        s.undo().unwrap();
        assert_eq!(s.tree().iter().copied().collect::<String>(), "A");
        assert_eq!(s.undo(), Err(SessionError::NoSavedState));
    }

    #[tokio::test]
    async fn failed_operations_still_save_state() {
        let mut s = session();
        s.insert('A').await.unwrap();
        let frames = s.sequencer().renderer().frames.len();

        assert_eq!(s.insert('A').await, Err(SessionError::Tree(TreeError::DuplicateKey('A'))));
        assert_eq!(s.remove('Z').await, Err(SessionError::Tree(TreeError::KeyNotFound('Z'))));
        assert_eq!(s.sequencer().renderer().frames.len(), frames);
        assert_eq!(s.tree().len(), 1);

        // undoing a failed call is a no-op on the shape
        s.undo().unwrap();
        assert_eq!(s.tree().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn operations_take_one_pace_per_step() {
        let pace = Duration::from_millis(300);
        let mut s: Session<char, NullRenderer> = Session::new(Sequencer::new(NullRenderer, pace));
        let start = tokio::time::Instant::now();
        s.insert('A').await.unwrap();
        s.insert('B').await.unwrap();
        s.insert('C').await.unwrap();
        // three placements and one rotation
        assert!(start.elapsed() >= pace * 4);
        assert!(start.elapsed() < pace * 5);

        let start = tokio::time::Instant::now();
        s.undo().unwrap();
        s.show();
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[test]
    fn error_messages() {
        let e: SessionError<char> = TreeError::DuplicateKey('A').into();
        assert_eq!(e.to_string(), "A is already in the tree");
        assert_eq!(SessionError::<char>::NoSavedState.to_string(), "no saved state");
        assert_eq!(TreeError::KeyNotFound('Q').to_string(), "Q is not in the tree");
    }
}
