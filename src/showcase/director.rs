//! Scene lifecycle director for the showroom engine
//!
//! Drives the transition from the resident scene to a requested target:
//! fade the frame out, dispose the outgoing scene, clear the stage, build
//! and initialize the incoming scene, persist the selection, and fade back
//! in. The director owns the only cache entry for loaded scene code and is
//! the sole writer of stage content.
//!
//! Rapid repeated requests collapse to the most recent target: a new
//! request abandons any pending fade timer (last-write-wins, never a
//! queue). A generation counter tags each request so a superseded
//! transition can never activate, even if a completion for it is still in
//! flight.

use std::path::PathBuf;

use log::{debug, error, info, warn};

use crate::error::ShowroomError;
use crate::gfx::stage::Stage;
use crate::showcase::persistence::SelectionStore;
use crate::showcase::registry::{SceneId, SceneRegistry};
use crate::showcase::traits::ShowScene;

/// Seconds the frame takes to fade to black before the swap
pub const FADE_OUT_SECS: f32 = 2.0;
/// Seconds the frame takes to fade back in after the swap
pub const FADE_IN_SECS: f32 = 2.0;

/// Where the director currently is in a transition
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScenePhase {
    /// No transition pending; `current` is the resident scene, if any
    Idle { current: Option<SceneId> },
    /// Fading the old frame out before the swap
    FadingOut {
        target: SceneId,
        remaining: f32,
        generation: u64,
    },
    /// New scene resident, frame fading back in
    FadingIn { current: SceneId, remaining: f32 },
}

/// Notifications emitted when a transition crosses a boundary
#[derive(Debug, Clone, PartialEq)]
pub enum DirectorEvent {
    /// The target scene is now resident and the selection was persisted
    SceneActivated {
        id: SceneId,
        audio: Option<PathBuf>,
    },
    /// The transition failed after teardown; no scene is resident
    TransitionAborted { id: SceneId },
}

/// Coordinates scene switching, disposal, and the fade timeline
pub struct SceneDirector {
    registry: SceneRegistry,
    store: SelectionStore,
    phase: ScenePhase,
    /// The loaded scene currently resident, if any. At most one entry.
    resident: Option<(SceneId, Box<dyn ShowScene>)>,
    generation: u64,
    fade_out_secs: f32,
    fade_in_secs: f32,
}

impl SceneDirector {
    /// Creates a director over the given registry and selection store
    pub fn new(registry: SceneRegistry, store: SelectionStore) -> Self {
        Self {
            registry,
            store,
            phase: ScenePhase::Idle { current: None },
            resident: None,
            generation: 0,
            fade_out_secs: FADE_OUT_SECS,
            fade_in_secs: FADE_IN_SECS,
        }
    }

    /// Overrides the fade durations (used by tests and demos)
    pub fn with_fade_durations(mut self, fade_out_secs: f32, fade_in_secs: f32) -> Self {
        self.fade_out_secs = fade_out_secs.max(0.0);
        self.fade_in_secs = fade_in_secs.max(0.0);
        self
    }

    /// Requests a switch to `target`
    ///
    /// Valid from any phase. A request made while another transition is
    /// pending supersedes it: the outstanding fade timer is abandoned and
    /// the sequence restarts toward the new target.
    pub fn request_switch(&mut self, target: SceneId) {
        if let ScenePhase::FadingOut {
            target: pending, ..
        } = self.phase
        {
            debug!("superseding pending switch to scene {}", pending);
        }

        self.generation = self.generation.wrapping_add(1);
        info!("switching to scene {}", target);
        self.phase = ScenePhase::FadingOut {
            target,
            remaining: self.fade_out_secs,
            generation: self.generation,
        };
    }

    /// Advances the transition timeline and the resident scene's animation
    ///
    /// Call once per frame. Returns an event when a transition crosses the
    /// swap boundary this frame.
    ///
    /// # Arguments
    /// * `delta_time` - Seconds elapsed since the previous frame
    /// * `stage` - The stage hosting scene content
    pub fn advance(&mut self, delta_time: f32, stage: &mut Stage) -> Option<DirectorEvent> {
        if let Some((_, scene)) = self.resident.as_mut() {
            scene.update(delta_time, stage);
        }

        match self.phase {
            ScenePhase::Idle { .. } => None,
            ScenePhase::FadingOut {
                target,
                remaining,
                generation,
            } => {
                let remaining = remaining - delta_time;
                if remaining > 0.0 {
                    self.phase = ScenePhase::FadingOut {
                        target,
                        remaining,
                        generation,
                    };
                    None
                } else {
                    self.perform_swap(target, generation, stage)
                }
            }
            ScenePhase::FadingIn { current, remaining } => {
                let remaining = remaining - delta_time;
                self.phase = if remaining > 0.0 {
                    ScenePhase::FadingIn { current, remaining }
                } else {
                    ScenePhase::Idle {
                        current: Some(current),
                    }
                };
                None
            }
        }
    }

    /// Disposes the old scene, clears the stage, and activates the target
    ///
    /// The outgoing scene is torn down before the target is resolved, so an
    /// unknown id leaves the showroom with no resident scene. Teardown is
    /// committed before the target is validated; that ordering is
    /// intentional.
    fn perform_swap(
        &mut self,
        target: SceneId,
        generation: u64,
        stage: &mut Stage,
    ) -> Option<DirectorEvent> {
        if generation != self.generation {
            debug!(
                "ignoring completion of superseded switch to scene {}",
                target
            );
            return None;
        }

        self.dispose_resident(stage);
        stage.clear();

        let descriptor = match self.registry.lookup(target) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                error!("cannot switch scene: {}", err);
                self.phase = ScenePhase::Idle { current: None };
                return Some(DirectorEvent::TransitionAborted { id: target });
            }
        };

        let mut scene = (descriptor.build)();
        let audio = descriptor.audio.clone();
        if let Err(source) = scene.initialize(stage) {
            let err = ShowroomError::SceneInit { id: target, source };
            error!("{:#}", anyhow::Error::from(err));
            stage.clear();
            self.phase = ScenePhase::Idle { current: None };
            return Some(DirectorEvent::TransitionAborted { id: target });
        }

        info!("scene {} ({}) is live", target, scene.name());
        self.resident = Some((target, scene));
        self.store.save(target);
        self.phase = ScenePhase::FadingIn {
            current: target,
            remaining: self.fade_in_secs,
        };

        Some(DirectorEvent::SceneActivated { id: target, audio })
    }

    /// Disposes the resident scene, if any
    ///
    /// Failures are logged and treated as best-effort cleanup. Calling this
    /// when nothing is resident is a no-op, so disposal is idempotent.
    pub fn dispose_resident(&mut self, stage: &mut Stage) {
        if let Some((id, mut scene)) = self.resident.take() {
            if let Err(source) = scene.dispose(stage) {
                let err = ShowroomError::ResourceDispose { id, source };
                warn!("{:#}", anyhow::Error::from(err));
            } else {
                debug!("scene {} resources disposed", id);
            }
        }
    }

    /// Cancels pending work and releases everything the director holds
    ///
    /// After shutdown the director is idle with no resident scene; the
    /// stage is cleared. Safe to call more than once.
    pub fn shutdown(&mut self, stage: &mut Stage) {
        self.dispose_resident(stage);
        stage.clear();
        self.phase = ScenePhase::Idle { current: None };
    }

    /// Whole-frame opacity for the renderer, in `[0, 1]`
    pub fn fade_alpha(&self) -> f32 {
        match self.phase {
            ScenePhase::Idle { current: Some(_) } => 1.0,
            ScenePhase::Idle { current: None } => 0.0,
            ScenePhase::FadingOut { remaining, .. } => {
                if self.fade_out_secs > 0.0 {
                    (remaining / self.fade_out_secs).clamp(0.0, 1.0)
                } else {
                    0.0
                }
            }
            ScenePhase::FadingIn { remaining, .. } => {
                if self.fade_in_secs > 0.0 {
                    (1.0 - remaining / self.fade_in_secs).clamp(0.0, 1.0)
                } else {
                    1.0
                }
            }
        }
    }

    /// Id of the resident scene, if any
    pub fn current_scene(&self) -> Option<SceneId> {
        self.resident.as_ref().map(|(id, _)| *id)
    }

    /// True while a fade or swap is pending
    pub fn is_transitioning(&self) -> bool {
        !matches!(self.phase, ScenePhase::Idle { .. })
    }

    /// Current phase, for UI and diagnostics
    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    /// The registry backing this director
    pub fn registry(&self) -> &SceneRegistry {
        &self.registry
    }

    /// The persisted selection, falling back to the default scene
    pub fn saved_selection(&self) -> SceneId {
        self.store.load()
    }

    /// Forwards UI rendering to the resident scene
    pub fn render_resident_ui(&mut self, ui: &imgui::Ui) {
        if let Some((_, scene)) = self.resident.as_mut() {
            scene.render_ui(ui);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::showcase::registry::SceneDescriptor;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// What probe scenes record into the shared journal
    #[derive(Debug, Clone, PartialEq)]
    enum Note {
        Init(u32),
        Update(u32),
        Dispose(u32),
    }

    type Journal = Rc<RefCell<Vec<Note>>>;

    struct ProbeScene {
        id: u32,
        journal: Journal,
        fail_init: bool,
        fail_dispose: bool,
    }

    impl ShowScene for ProbeScene {
        fn initialize(&mut self, stage: &mut Stage) -> anyhow::Result<()> {
            if self.fail_init {
                anyhow::bail!("init refused");
            }
            self.journal.borrow_mut().push(Note::Init(self.id));
            stage.add_material_rgb("probe", 1.0, 0.0, 0.0, 0.0, 0.5);
            Ok(())
        }

        fn update(&mut self, _delta_time: f32, _stage: &mut Stage) {
            self.journal.borrow_mut().push(Note::Update(self.id));
        }

        fn name(&self) -> &str {
            "probe"
        }

        fn dispose(&mut self, _stage: &mut Stage) -> anyhow::Result<()> {
            self.journal.borrow_mut().push(Note::Dispose(self.id));
            if self.fail_dispose {
                anyhow::bail!("dispose exploded");
            }
            Ok(())
        }
    }

    fn probe_descriptor(id: u32, journal: &Journal, fail_init: bool) -> SceneDescriptor {
        let journal = journal.clone();
        SceneDescriptor {
            id: SceneId(id),
            display_name: "Probe",
            description: "probe scene",
            audio: Some(PathBuf::from(format!("assets/sound/{}.ogg", id))),
            build: Box::new(move || {
                Box::new(ProbeScene {
                    id,
                    journal: journal.clone(),
                    fail_init,
                    fail_dispose: false,
                })
            }),
        }
    }

    static STORE_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn scratch_store() -> SelectionStore {
        let n = STORE_COUNTER.fetch_add(1, Ordering::Relaxed);
        SelectionStore::new(std::env::temp_dir().join(format!(
            "showroom-director-{}-{}",
            std::process::id(),
            n
        )))
    }

    fn director_with(ids: &[u32], journal: &Journal) -> SceneDirector {
        let mut registry = SceneRegistry::new();
        for &id in ids {
            registry.register(probe_descriptor(id, journal, false));
        }
        SceneDirector::new(registry, scratch_store()).with_fade_durations(1.0, 1.0)
    }

    /// Steps the director in small increments for `secs` seconds
    fn run_for(director: &mut SceneDirector, stage: &mut Stage, secs: f32) -> Vec<DirectorEvent> {
        let mut events = Vec::new();
        let steps = (secs / 0.1).round() as usize;
        for _ in 0..steps {
            if let Some(event) = director.advance(0.1, stage) {
                events.push(event);
            }
        }
        events
    }

    #[test]
    fn switch_activates_target_and_persists() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1, 2], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(2));
        let events = run_for(&mut director, &mut stage, 1.2);

        assert_eq!(director.current_scene(), Some(SceneId(2)));
        assert!(journal.borrow().contains(&Note::Init(2)));
        assert_eq!(director.saved_selection(), SceneId(2));
        assert!(matches!(
            events.first(),
            Some(DirectorEvent::SceneActivated { id: SceneId(2), .. })
        ));
    }

    #[test]
    fn switch_disposes_previous_scene_first() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1, 2], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);
        director.request_switch(SceneId(2));
        run_for(&mut director, &mut stage, 2.5);

        let notes = journal.borrow();
        let dispose_pos = notes.iter().position(|n| *n == Note::Dispose(1)).unwrap();
        let init_pos = notes.iter().position(|n| *n == Note::Init(2)).unwrap();
        assert!(dispose_pos < init_pos, "old scene must go before new init");
        assert_eq!(director.current_scene(), Some(SceneId(2)));
    }

    #[test]
    fn rapid_requests_collapse_to_most_recent_target() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1, 2, 3], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(2));
        run_for(&mut director, &mut stage, 0.5); // mid fade-out
        director.request_switch(SceneId(3));
        run_for(&mut director, &mut stage, 2.5);

        assert_eq!(director.current_scene(), Some(SceneId(3)));
        assert!(
            !journal.borrow().contains(&Note::Init(2)),
            "superseded target must never initialize"
        );
    }

    #[test]
    fn unknown_target_aborts_after_teardown() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);
        director.request_switch(SceneId(9));
        let events = run_for(&mut director, &mut stage, 1.5);

        // Documented defect preserved: the old scene is gone even though
        // the new one never loaded.
        assert!(journal.borrow().contains(&Note::Dispose(1)));
        assert_eq!(director.current_scene(), None);
        assert!(!director.is_transitioning());
        assert!(events.contains(&DirectorEvent::TransitionAborted { id: SceneId(9) }));
    }

    #[test]
    fn failed_initialize_leaves_degraded_idle() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SceneRegistry::new();
        registry.register(probe_descriptor(1, &journal, true));
        let mut director =
            SceneDirector::new(registry, scratch_store()).with_fade_durations(1.0, 1.0);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        let events = run_for(&mut director, &mut stage, 1.5);

        assert_eq!(director.current_scene(), None);
        assert_eq!(stage.object_count(), 0);
        assert!(events.contains(&DirectorEvent::TransitionAborted { id: SceneId(1) }));
    }

    #[test]
    fn dispose_is_idempotent() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);

        director.dispose_resident(&mut stage);
        director.dispose_resident(&mut stage);

        let disposals = journal
            .borrow()
            .iter()
            .filter(|n| **n == Note::Dispose(1))
            .count();
        assert_eq!(disposals, 1);
    }

    #[test]
    fn dispose_failure_is_nonfatal() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut registry = SceneRegistry::new();
        let j = journal.clone();
        registry.register(SceneDescriptor {
            id: SceneId(1),
            display_name: "Grumpy",
            description: "fails to dispose",
            audio: None,
            build: Box::new(move || {
                Box::new(ProbeScene {
                    id: 1,
                    journal: j.clone(),
                    fail_init: false,
                    fail_dispose: true,
                })
            }),
        });
        registry.register(probe_descriptor(2, &journal, false));
        let mut director =
            SceneDirector::new(registry, scratch_store()).with_fade_durations(1.0, 1.0);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);
        director.request_switch(SceneId(2));
        run_for(&mut director, &mut stage, 2.5);

        assert_eq!(director.current_scene(), Some(SceneId(2)));
    }

    #[test]
    fn fade_alpha_tracks_the_transition() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1], &journal);
        let mut stage = Stage::new();

        assert_eq!(director.fade_alpha(), 0.0);

        director.request_switch(SceneId(1));
        director.advance(0.5, &mut stage);
        let mid_out = director.fade_alpha();
        assert!(mid_out > 0.0 && mid_out < 1.0);

        run_for(&mut director, &mut stage, 0.6); // crosses the swap
        let mid_in = director.fade_alpha();
        assert!(mid_in < 1.0);

        run_for(&mut director, &mut stage, 1.5);
        assert_eq!(director.fade_alpha(), 1.0);
    }

    #[test]
    fn shutdown_cancels_pending_transition() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1, 2], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);
        director.request_switch(SceneId(2));
        director.advance(0.2, &mut stage);
        director.shutdown(&mut stage);

        assert!(!director.is_transitioning());
        assert_eq!(director.current_scene(), None);
        assert!(journal.borrow().contains(&Note::Dispose(1)));
        assert!(!journal.borrow().contains(&Note::Init(2)));

        // Shutting down twice is fine.
        director.shutdown(&mut stage);
    }

    #[test]
    fn resident_scene_keeps_animating_during_fade_out() {
        let journal: Journal = Rc::new(RefCell::new(Vec::new()));
        let mut director = director_with(&[1, 2], &journal);
        let mut stage = Stage::new();

        director.request_switch(SceneId(1));
        run_for(&mut director, &mut stage, 2.5);
        journal.borrow_mut().clear();

        director.request_switch(SceneId(2));
        director.advance(0.1, &mut stage);

        assert!(journal.borrow().contains(&Note::Update(1)));
    }
}
