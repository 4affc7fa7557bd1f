//! One-time construction of the isolated seed-phrase frame.
//!
//! The frame is keyed by [`tk_client::IMPORT_FRAME_ELEMENT_ID`]. While the
//! create dialog is open in import mode the slot hands out at most one
//! construction ticket; a frame already present in the document is never
//! constructed twice.

use crate::create::CreateMode;
use tk_client::IMPORT_FRAME_ELEMENT_ID;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameClaim {
    /// Dialog closed or generate mode; no frame wanted.
    NotNeeded,
    /// The caller must construct the frame and `install` it.
    Construct,
    AlreadyInstalled,
    /// A construction is in flight or the element already exists.
    Skip,
}

#[derive(Debug)]
pub struct ImportFrameSlot<F> {
    frame: Option<F>,
    constructing: bool,
}

impl<F> Default for ImportFrameSlot<F> {
    fn default() -> Self {
        Self {
            frame: None,
            constructing: false,
        }
    }
}

impl<F> ImportFrameSlot<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, dialog_open: bool, mode: CreateMode, frame_present: bool) -> FrameClaim {
        if !dialog_open || mode != CreateMode::Import {
            return FrameClaim::NotNeeded;
        }
        if self.frame.is_some() {
            return FrameClaim::AlreadyInstalled;
        }
        if self.constructing || frame_present {
            debug!(element_id = IMPORT_FRAME_ELEMENT_ID, "import frame construction skipped");
            return FrameClaim::Skip;
        }
        self.constructing = true;
        FrameClaim::Construct
    }

    /// Finish a construction started by a `Construct` claim.
    ///
    /// `dialog_open` and `mode` are re-read after the construction awaited:
    /// when the dialog closed or switched to generate mode meanwhile, the
    /// frame is handed back for the caller to drop instead of being kept.
    pub fn install(&mut self, result: anyhow::Result<F>, dialog_open: bool, mode: CreateMode) -> Option<F> {
        self.constructing = false;
        match result {
            Ok(frame) if dialog_open && mode == CreateMode::Import => {
                self.frame = Some(frame);
                None
            }
            Ok(frame) => {
                debug!(element_id = IMPORT_FRAME_ELEMENT_ID, "import frame no longer wanted");
                Some(frame)
            }
            Err(err) => {
                warn!("error initializing import frame: {err:#}");
                None
            }
        }
    }

    pub fn frame(&self) -> Option<&F> {
        self.frame.as_ref()
    }

    /// Forget the frame once its element has left the document.
    pub fn reset(&mut self) -> Option<F> {
        self.constructing = false;
        self.frame.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tk_client::ImportFrameFactory;
    use tk_client::memory::{MemoryFrameFactory, ScriptedImportFrame};

    fn factory() -> MemoryFrameFactory {
        MemoryFrameFactory::new(ScriptedImportFrame::new(true, "encrypted"))
    }

    /// The dashboard's sequence: claim, construct outside the slot, install.
    async fn open_import(slot: &mut ImportFrameSlot<ScriptedImportFrame>, factory: &MemoryFrameFactory) {
        let present = factory.frame_exists(IMPORT_FRAME_ELEMENT_ID);
        if slot.claim(true, CreateMode::Import, present) == FrameClaim::Construct {
            let created = factory.create_frame(IMPORT_FRAME_ELEMENT_ID).await;
            assert!(slot.install(created, true, CreateMode::Import).is_none());
        }
    }

    #[tokio::test]
    async fn constructs_once_per_open_import_dialog() {
        let factory = factory();
        let mut slot = ImportFrameSlot::new();

        open_import(&mut slot, &factory).await;
        assert!(slot.frame().is_some());
        open_import(&mut slot, &factory).await;
        assert_eq!(slot.claim(true, CreateMode::Import, true), FrameClaim::AlreadyInstalled);
        assert_eq!(factory.created(), 1);
    }

    #[test]
    fn generate_mode_or_closed_dialog_needs_nothing() {
        let mut slot: ImportFrameSlot<ScriptedImportFrame> = ImportFrameSlot::new();
        assert_eq!(slot.claim(true, CreateMode::Generate, false), FrameClaim::NotNeeded);
        assert_eq!(slot.claim(false, CreateMode::Import, false), FrameClaim::NotNeeded);
        assert!(slot.frame().is_none());
    }

    #[tokio::test]
    async fn existing_element_prevents_duplicate_frame() {
        let factory = factory();
        factory.mark_present(IMPORT_FRAME_ELEMENT_ID);
        let mut slot = ImportFrameSlot::new();

        open_import(&mut slot, &factory).await;
        assert!(slot.frame().is_none());
        assert_eq!(factory.created(), 0);
    }

    #[tokio::test]
    async fn reopening_after_reset_builds_a_fresh_frame() {
        let factory = factory();
        let mut slot = ImportFrameSlot::new();

        open_import(&mut slot, &factory).await;
        assert!(slot.reset().is_some());
        factory.remove(IMPORT_FRAME_ELEMENT_ID);

        open_import(&mut slot, &factory).await;
        assert!(slot.frame().is_some());
        assert_eq!(factory.created(), 2);
    }

    #[tokio::test]
    async fn frame_finished_after_dialog_closed_is_handed_back() -> anyhow::Result<()> {
        let factory = factory();
        let mut slot = ImportFrameSlot::new();

        assert_eq!(slot.claim(true, CreateMode::Import, false), FrameClaim::Construct);
        let created = factory.create_frame(IMPORT_FRAME_ELEMENT_ID).await;
        // The dialog closed while the frame was loading.
        assert!(slot.reset().is_none());

        let stale = slot.install(created, false, CreateMode::Import);
        assert!(stale.is_some());
        assert!(slot.frame().is_none());
        assert_eq!(slot.claim(false, CreateMode::Import, false), FrameClaim::NotNeeded);
        Ok(())
    }

    #[tokio::test]
    async fn frame_finished_after_switch_to_generate_is_handed_back() {
        let factory = factory();
        let mut slot = ImportFrameSlot::new();

        assert_eq!(slot.claim(true, CreateMode::Import, false), FrameClaim::Construct);
        let created = factory.create_frame(IMPORT_FRAME_ELEMENT_ID).await;

        assert!(slot.install(created, true, CreateMode::Generate).is_some());
        assert!(slot.frame().is_none());
    }

    #[test]
    fn in_flight_construction_is_not_claimed_twice() {
        let mut slot: ImportFrameSlot<ScriptedImportFrame> = ImportFrameSlot::new();
        assert_eq!(slot.claim(true, CreateMode::Import, false), FrameClaim::Construct);
        assert_eq!(slot.claim(true, CreateMode::Import, false), FrameClaim::Skip);

        let failed = slot.install(Err(anyhow::anyhow!("frame failed to load")), true, CreateMode::Import);
        assert!(failed.is_none());
        assert!(slot.frame().is_none());
        assert_eq!(slot.claim(true, CreateMode::Import, false), FrameClaim::Construct);
    }
}
