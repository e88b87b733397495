mod gpu;
mod overlay;
mod pointer_hand;

use app_core::{
    CameraConfig, DetectorOptions, FrameClock, GestureControl, OrbitCamera, SharedState,
    TreeScene,
};
use pointer_hand::{PointerCamera, PointerHandDetector, PointerHandle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::event::*;
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

/// `TREE_SEED=<u64>` pins the particle layout; otherwise it is random.
fn scene_rng() -> StdRng {
    match std::env::var("TREE_SEED").ok().map(|s| s.parse::<u64>()) {
        Some(Ok(seed)) => {
            log::info!("[scene] seed {seed} from TREE_SEED");
            StdRng::seed_from_u64(seed)
        }
        Some(Err(e)) => {
            log::warn!("[scene] ignoring TREE_SEED: {e}");
            StdRng::from_entropy()
        }
        None => StdRng::from_entropy(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let shared = SharedState::new();
    let pointer = PointerHandle::default();
    let writer = shared.clone();
    let mut gesture = GestureControl::connect(
        PointerCamera::new(pointer.clone()),
        PointerHandDetector::default(),
        &CameraConfig::default(),
        &DetectorOptions::default(),
        Box::new(move |update| {
            writer.apply(update);
        }),
    );
    let gesture_active = gesture.is_active();

    let mut scene = TreeScene::new(&mut scene_rng());
    let mut orbit = OrbitCamera::default();
    orbit.auto_rotate = shared.mode().auto_rotates();

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let window = WindowBuilder::new()
        .with_title(overlay::title(shared.mode(), gesture_active))
        .with_inner_size(winit::dpi::LogicalSize::new(1280.0, 800.0))
        .build(&event_loop)?;

    let mut gpu = pollster::block_on(gpu::GpuState::new(&window, &scene))?;
    let mut clock = FrameClock::new();
    let mut seen_revision = shared.revision();
    overlay::log_controls();

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        logical_key: Key::Named(NamedKey::Escape),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => elwt.exit(),
            WindowEvent::Resized(size) => gpu.resize(size),
            WindowEvent::CursorMoved { position, .. } => {
                let size = gpu.window.inner_size();
                pointer.move_to(
                    position.x as f32 / size.width.max(1) as f32,
                    position.y as f32 / size.height.max(1) as f32,
                );
            }
            WindowEvent::CursorLeft { .. } => pointer.leave(),
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => pointer.set_pressed(state == ElementState::Pressed),
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(p) => p.y as f32 / 40.0,
                };
                orbit.zoom(steps);
            }
            _ => {}
        },
        Event::AboutToWait => {
            gesture.pump();
            let snapshot = shared.snapshot();
            if snapshot.revision != seen_revision {
                seen_revision = snapshot.revision;
                orbit.auto_rotate = snapshot.mode.auto_rotates();
                gpu.window
                    .set_title(&overlay::title(snapshot.mode, gesture_active));
            }

            let time = clock.tick();
            orbit.update(time.dt);
            scene.update(&snapshot, time.dt, time.elapsed);

            let camera = orbit.to_camera(gpu.aspect());
            match gpu.render(&mut scene, &camera, time.elapsed) {
                Ok(_) => gpu.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    gpu.resize(gpu.window.inner_size())
                }
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(e) => log::warn!("[gpu] frame skipped: {e:?}"),
            }
        }
        _ => {}
    })?;
    Ok(())
}
