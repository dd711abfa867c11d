use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::{KeyCode, PhysicalKey},
    window::WindowBuilder,
};
use xr_core::draw::build_draw_list;
use xr_core::model::{load_controller_model, ProceduralModels};
use xr_core::{PressOutcome, SceneConfig};

mod gpu;
mod sim;

use sim::{Simulator, DESIGNATED, SECONDARY};

// Profiles advertised by the emulated controllers.
const SIM_PROFILES: [&str; 2] = ["generic-trigger-squeeze-thumbstick", "generic-trigger"];

fn log_press(outcome: PressOutcome) {
    if let PressOutcome::Painted { pixel, .. } = outcome {
        log::debug!("[sim] painted pixel ({:.1}, {:.1})", pixel.x, pixel.y);
    }
}

fn handle_key(sim: &mut Simulator, code: KeyCode, state: ElementState, repeat: bool) {
    let pressed = state == ElementState::Pressed;
    match code {
        KeyCode::KeyV if pressed && !repeat => sim.toggle_session(),
        KeyCode::Space if !repeat => {
            if pressed {
                log_press(sim.press(SECONDARY));
            } else {
                sim.release(SECONDARY);
            }
        }
        KeyCode::ArrowLeft if pressed => sim.nudge_secondary(-1, 0),
        KeyCode::ArrowRight if pressed => sim.nudge_secondary(1, 0),
        KeyCode::ArrowUp if pressed => sim.nudge_secondary(0, 1),
        KeyCode::ArrowDown if pressed => sim.nudge_secondary(0, -1),
        _ => {}
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .init();

    let config = SceneConfig::default();
    let mut sim = Simulator::new(config.clone())?;

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("xr-canvas simulator (V: toggle session)")
        .build(&event_loop)?;
    let mut state = pollster::block_on(gpu::GpuState::new(&window, &config))?;
    sim.set_aspect(state.aspect());

    let profiles: Vec<String> = SIM_PROFILES.iter().map(|p| p.to_string()).collect();
    for id in [DESIGNATED, SECONDARY] {
        let model = load_controller_model(&ProceduralModels, &profiles, id);
        state.set_controller_model(id, &model);
    }
    log::info!("simulator ready; press V to enter the emulated session");

    event_loop.run(move |event, elwt| match event {
        Event::WindowEvent { event, .. } => match event {
            WindowEvent::Resized(size) => {
                state.resize(size);
                sim.set_aspect(state.aspect());
            }
            WindowEvent::CloseRequested => elwt.exit(),
            WindowEvent::CursorMoved { position, .. } => {
                sim.set_cursor(position.x, position.y, state.width, state.height);
            }
            WindowEvent::CursorLeft { .. } => sim.clear_cursor(),
            WindowEvent::MouseInput {
                state: button_state,
                button: MouseButton::Left,
                ..
            } => match button_state {
                ElementState::Pressed => log_press(sim.press(DESIGNATED)),
                ElementState::Released => {
                    sim.release(DESIGNATED);
                }
            },
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    handle_key(&mut sim, code, event.state, event.repeat);
                }
            }
            _ => {}
        },
        Event::AboutToWait => {
            let controllers = sim.frame();
            state.sync_panel(&mut sim.ctx.panel_mut().buffer);
            let items = build_draw_list(&sim.ctx, &controllers);
            match state.render(sim.projection() * sim.view(), &items) {
                Ok(_) => state.window.request_redraw(),
                Err(wgpu::SurfaceError::Lost) => state.resize(state.window.inner_size()),
                Err(wgpu::SurfaceError::OutOfMemory) => elwt.exit(),
                Err(_) => {}
            }
        }
        _ => {}
    })?;
    Ok(())
}
