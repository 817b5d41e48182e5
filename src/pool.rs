use crate::coord::Coord;
use crate::error::{EngineError, Result};

/// Number of handles created up front when no config overrides it.
pub const DEFAULT_WARM_SIZE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandleId(pub usize);

/// A reusable cube token. Renderers read `position` of active handles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CubeHandle {
    pub id: HandleId,
    pub active: bool,
    pub position: Option<Coord>,
}

/// Grow-only pool of cube handles. Handles are never destroyed, only
/// deactivated, so a level's worth of cubes is allocated at most once.
#[derive(Debug, Clone)]
pub struct CellPool {
    handles: Vec<CubeHandle>,
}

impl CellPool {
    pub fn with_capacity(warm: usize) -> Self {
        let handles = (0..warm)
            .map(|i| CubeHandle {
                id: HandleId(i),
                active: false,
                position: None,
            })
            .collect();
        Self { handles }
    }

    /// Activate the first inactive handle, or grow the pool by one.
    pub fn request(&mut self) -> HandleId {
        if let Some(handle) = self.handles.iter_mut().find(|h| !h.active) {
            handle.active = true;
            return handle.id;
        }

        let id = HandleId(self.handles.len());
        log::debug!("cell pool grew to {}", self.handles.len() + 1);
        self.handles.push(CubeHandle {
            id,
            active: true,
            position: None,
        });
        id
    }

    /// Set where a handle's cube sits.
    pub fn place(&mut self, id: HandleId, at: Coord) -> Result<()> {
        let handle = self
            .handles
            .get_mut(id.0)
            .ok_or(EngineError::UnknownHandle(id))?;
        handle.position = Some(at);
        Ok(())
    }

    pub fn release(&mut self, id: HandleId) -> Result<()> {
        let handle = self
            .handles
            .get_mut(id.0)
            .ok_or(EngineError::UnknownHandle(id))?;
        handle.active = false;
        handle.position = None;
        Ok(())
    }

    pub fn release_all(&mut self) {
        for handle in &mut self.handles {
            handle.active = false;
            handle.position = None;
        }
    }

    pub fn get(&self, id: HandleId) -> Option<&CubeHandle> {
        self.handles.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn active_count(&self) -> usize {
        self.handles.iter().filter(|h| h.active).count()
    }

    pub fn active(&self) -> impl Iterator<Item = &CubeHandle> {
        self.handles.iter().filter(|h| h.active)
    }
}

impl Default for CellPool {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_WARM_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warm_pool_starts_inactive() {
        let pool = CellPool::with_capacity(25);
        assert_eq!(pool.len(), 25);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_request_reuses_before_growing() {
        let mut pool = CellPool::with_capacity(2);

        let a = pool.request();
        let b = pool.request();
        assert_ne!(a, b);
        assert_eq!(pool.len(), 2);

        pool.release(a).unwrap();
        let c = pool.request();
        assert_eq!(c, a, "released handle should be handed out again");
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn test_pool_grows_when_exhausted_and_never_shrinks() {
        let mut pool = CellPool::with_capacity(1);
        pool.request();
        let grown = pool.request();

        assert_eq!(grown, HandleId(1));
        assert_eq!(pool.len(), 2);

        pool.release_all();
        assert_eq!(pool.len(), 2);
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_place_sets_position_and_release_clears_it() {
        let mut pool = CellPool::with_capacity(0);
        let id = pool.request();
        pool.place(id, Coord::new(3, 4)).unwrap();

        assert_eq!(pool.get(id).unwrap().position, Some(Coord::new(3, 4)));
        assert_eq!(pool.active().count(), 1);

        pool.release(id).unwrap();
        let handle = pool.get(id).unwrap();
        assert!(!handle.active);
        assert_eq!(handle.position, None);
    }

    #[test]
    fn test_unknown_handle_is_rejected() {
        let mut pool = CellPool::with_capacity(1);
        assert!(matches!(
            pool.release(HandleId(7)),
            Err(EngineError::UnknownHandle(HandleId(7)))
        ));
        assert!(pool.place(HandleId(7), Coord::new(0, 0)).is_err());
    }
}
