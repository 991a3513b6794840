//! Application shell for the showroom
//!
//! Owns the winit event loop and per-frame orchestration: input routing,
//! the audio unlock latch, director advancement, and rendering with the
//! menu and description overlay on top.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowAttributes},
};

use crate::audio::AudioCrossfader;
use crate::error::ShowroomError;
use crate::gfx::{rendering::render_engine::RenderEngine, stage::Stage};
use crate::showcase::{
    director::{DirectorEvent, SceneDirector},
    persistence::SelectionStore,
    registry::{SceneId, SceneRegistry},
};
use crate::ui::{manager::UiManager, overlay::DescriptionOverlay, overlay::SceneMenu};

/// Longest frame delta fed into animations and fades, seconds
const MAX_FRAME_DELTA: f32 = 0.25;

/// The showroom application
///
/// Construct with a registry and selection store, then call
/// [`run`](ShowroomApp::run) to enter the event loop.
pub struct ShowroomApp {
    event_loop: Option<EventLoop<()>>,
    app_state: AppState,
}

struct AppState {
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    stage: Stage,
    director: SceneDirector,
    audio: AudioCrossfader,
    description: DescriptionOverlay,
    last_frame: Instant,
}

impl ShowroomApp {
    /// Creates the application over the given scene registry and store
    pub fn new(registry: SceneRegistry, store: SelectionStore) -> Self {
        let event_loop = EventLoop::new().expect("Failed to create event loop");

        Self {
            event_loop: Some(event_loop),
            app_state: AppState {
                window: None,
                render_engine: None,
                ui_manager: None,
                stage: Stage::new(),
                director: SceneDirector::new(registry, store),
                audio: AudioCrossfader::new(),
                description: DescriptionOverlay::new(),
                last_frame: Instant::now(),
            },
        }
    }

    /// Runs the application (consumes self and starts the event loop)
    pub fn run(mut self) {
        let event_loop = self.event_loop.take().expect("Event loop already consumed");
        event_loop.set_control_flow(ControlFlow::Poll);

        event_loop
            .run_app(&mut self.app_state)
            .expect("Failed to run event loop");
    }
}

impl AppState {
    /// Routes a switch request, guarding against a missing stage surface
    fn request_scene_switch(&mut self, target: SceneId) {
        if self.window.is_none() || self.render_engine.is_none() {
            error!("{}", ShowroomError::ContainerMissing);
            return;
        }
        self.director.request_switch(target);
    }

    /// Feeds the audio unlock latch; on first open, starts the saved
    /// selection's track
    fn unlock_audio(&mut self) {
        if !self.audio.unlock() {
            return;
        }

        let id = self
            .director
            .current_scene()
            .unwrap_or_else(|| self.director.saved_selection());
        let track = self
            .director
            .registry()
            .lookup(id)
            .ok()
            .and_then(|descriptor| descriptor.audio.clone());

        if let Some(track) = track {
            if let Err(err) = self.audio.play(&track) {
                error!("{:#}", anyhow::Error::from(err));
            }
        }
    }

    fn handle_director_event(&mut self, event: DirectorEvent) {
        match event {
            DirectorEvent::SceneActivated { id, audio } => {
                if let Ok(descriptor) = self.director.registry().lookup(id) {
                    self.description.set_text(descriptor.description);
                }
                if let Some(track) = audio {
                    // Suppressed internally until the unlock latch opens
                    if let Err(err) = self.audio.play(&track) {
                        error!("{:#}", anyhow::Error::from(err));
                    }
                }
            }
            DirectorEvent::TransitionAborted { id } => {
                error!("transition to scene {} aborted", id);
            }
        }
    }

    fn render_frame(&mut self) {
        let now = Instant::now();
        let delta_time = (now - self.last_frame).as_secs_f32().min(MAX_FRAME_DELTA);
        self.last_frame = now;

        if let Some(event) = self.director.advance(delta_time, &mut self.stage) {
            self.handle_director_event(event);
        }
        self.description.update(delta_time);
        self.stage.update();

        let fade = self.director.fade_alpha();

        let Some(engine) = self.render_engine.as_mut() else {
            return;
        };
        let Some(window) = self.window.as_ref() else {
            return;
        };
        let Some(ui_manager) = self.ui_manager.as_mut() else {
            return;
        };

        self.stage.init_gpu_resources(engine.device(), engine.queue());
        self.stage.update_all_transforms(engine.queue());
        engine.update(&self.stage, fade);

        let stage = &self.stage;
        let director = &mut self.director;
        let description = &self.description;
        let mut clicked = None;

        engine.render_frame(
            stage,
            fade,
            Some(|device: &wgpu::Device,
                  queue: &wgpu::Queue,
                  encoder: &mut wgpu::CommandEncoder,
                  view: &wgpu::TextureView| {
                ui_manager.draw(device, queue, encoder, window, view, |ui| {
                    clicked = SceneMenu::render(ui, director.registry(), fade);
                    description.render(ui);
                    director.render_resident_ui(ui);
                });
            }),
        );

        if let Some(target) = clicked {
            self.request_scene_switch(target);
        }
    }

    /// Cancels pending work, disposes the resident scene, stops audio
    fn shutdown(&mut self) {
        self.director.shutdown(&mut self.stage);
        self.audio.stop();
        info!("showroom shut down");
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = WindowAttributes::default()
            .with_title("Showroom")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));

        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                error!("{}: {}", ShowroomError::ContainerMissing, err);
                event_loop.exit();
                return;
            }
        };

        let (width, height) = window.inner_size().into();
        self.stage
            .camera_manager
            .camera
            .resize_projection(width, height);

        let window_clone = window.clone();
        let renderer =
            pollster::block_on(async move { RenderEngine::new(window_clone, width, height).await });

        let ui_manager = UiManager::new(
            renderer.device(),
            renderer.queue(),
            renderer.surface_format(),
            &window,
        );

        self.window = Some(window);
        self.ui_manager = Some(ui_manager);
        self.render_engine = Some(renderer);
        self.last_frame = Instant::now();

        // Restore the last-viewed scene, scene 1 on a fresh profile
        let saved = self.director.saved_selection();
        self.request_scene_switch(saved);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        // The unlock latch listens to raw gestures before UI capture so a
        // click on a menu button still counts as the first gesture
        match &event {
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                ..
            } => self.unlock_audio(),
            WindowEvent::KeyboardInput {
                event:
                    winit::event::KeyEvent {
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => self.unlock_audio(),
            _ => {}
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let ui_event: winit::event::Event<()> = winit::event::Event::WindowEvent {
                window_id,
                event: event.clone(),
            };
            if ui_manager.handle_input(&window, &ui_event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let winit::keyboard::PhysicalKey::Code(key_code) = key_event.physical_key {
                    match key_code {
                        winit::keyboard::KeyCode::Escape => event_loop.exit(),
                        winit::keyboard::KeyCode::KeyR
                            if key_event.state == ElementState::Pressed =>
                        {
                            self.stage.recall_camera();
                            window.request_redraw();
                        }
                        _ => {}
                    }
                }
                self.stage
                    .camera_manager
                    .process_keyboard_event(&key_event);
            }
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.stage
                    .camera_manager
                    .camera
                    .resize_projection(width, height);
                if let Some(engine) = self.render_engine.as_mut() {
                    engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame();
            }
            _ => (),
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: winit::event::DeviceId,
        event: winit::event::DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        // Camera input yields to the UI
        if let Some(ui_manager) = self.ui_manager.as_ref() {
            let io = ui_manager.context.io();
            if io.want_capture_mouse || io.want_capture_keyboard {
                return;
            }
        }

        self.stage.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(ref window) = self.window {
            window.request_redraw();
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}
