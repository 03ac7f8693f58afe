use crate::all::*;

use softbuffer::GraphicsContext;
use winit::event::{ElementState, Event, KeyboardInput, VirtualKeyCode, WindowEvent};
use winit::event_loop::ControlFlow;
use winit::window::Window;

pub struct EventLoopArgs<'a> {
  pub session: &'a mut Session,
  pub buffer: &'a mut Vec<u32>,
  pub graphics_context: &'a mut GraphicsContext<Window>,
  // Keep showing the last frame after the input ends.
  pub hold: bool,
  pub finished: bool,
}

pub fn handle_event(
  event: Event<()>,
  control_flow: &mut ControlFlow,
  args: &mut EventLoopArgs,
) -> Result<()> {
  let (window_width, window_height) = {
    let size = args.graphics_context.window().inner_size();
    (size.width as usize, size.height as usize)
  };
  if args.buffer.len() != window_width * window_height {
    *args.buffer = vec![0; window_width * window_height];
  }

  match event {
    Event::RedrawRequested(window_id) if window_id == args.graphics_context.window().id() => {
      args.graphics_context.set_buffer(&args.buffer, window_width as u16, window_height as u16);
    },
    Event::WindowEvent {
      event,
      window_id,
    } => {
      if event == WindowEvent::CloseRequested && window_id == args.graphics_context.window().id() {
        *control_flow = ControlFlow::Exit;
      }
      match event {
        WindowEvent::KeyboardInput {
          input: KeyboardInput {
            state: ElementState::Pressed,
            virtual_keycode: Some(keycode),
            ..
          },
          ..
        } => {
          match keycode {
            VirtualKeyCode::Escape | VirtualKeyCode::Q => {
              *control_flow = ControlFlow::Exit;
            },
            _ => {}, // Other keys.
          }
        },
        _ => {}, // Other window events.
      }
    },
    Event::MainEventsCleared => {
      if args.finished || *control_flow == ControlFlow::Exit { return Ok(()) }
      match args.session.step()? {
        Some(detection) => {
          let mut visualize_args = VisualizeArgs {
            buffer: &mut *args.buffer,
            buffer_w: window_width,
            buffer_h: window_height,
          };
          visualize(&mut visualize_args, &detection.composite);
          args.graphics_context.window().request_redraw();
          *control_flow = ControlFlow::Poll;
        },
        None => {
          args.finished = true;
          info!("End of input.");
          *control_flow = if args.hold { ControlFlow::Wait } else { ControlFlow::Exit };
        },
      }
    },
    _ => {}, // Other events.
  }
  Ok(())
}
