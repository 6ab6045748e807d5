//! SDL2 presentation context and frame pacing.
//!
//! [`Window`] owns every SDL handle the program needs. They are released in
//! field order when the window is dropped, on every exit path.

use std::thread;
use std::time::{Duration, Instant};

use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::{Keycode, Scancode};
use sdl2::pixels::PixelFormatEnum;
use sdl2::render::{BlendMode, Canvas, Texture, TextureCreator};
use sdl2::video::WindowContext;

use crate::color::PixelFormat;
use crate::input::{Controls, Key};
use crate::render::PixelBuffer;

/// Time left in the frame budget, or zero when the frame overran it.
pub fn frame_delay(elapsed: Duration, target: Duration) -> Duration {
    target.saturating_sub(elapsed)
}

/// Caps the frame rate by sleeping away the rest of each frame's budget.
pub struct FrameLimiter {
    target: Duration,
    frame_start: Instant,
}

impl FrameLimiter {
    pub fn new(fps: u32) -> Self {
        Self {
            target: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            frame_start: Instant::now(),
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    /// Marks the start of a frame.
    pub fn begin_frame(&mut self) {
        self.frame_start = Instant::now();
    }

    /// Sleeps until the frame budget is used up and returns how long the
    /// frame's own work took.
    pub fn end_frame(&mut self) -> Duration {
        let elapsed = self.frame_start.elapsed();
        let delay = frame_delay(elapsed, self.target);
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        elapsed
    }
}

fn texture_format(format: PixelFormat) -> PixelFormatEnum {
    match format {
        PixelFormat::Rgba32 => PixelFormatEnum::RGBA32,
        PixelFormat::Bgr24 => PixelFormatEnum::BGR24,
    }
}

fn key_for(scancode: Scancode) -> Option<Key> {
    match scancode {
        Scancode::W => Some(Key::Forward),
        Scancode::S => Some(Key::Back),
        Scancode::A => Some(Key::Left),
        Scancode::D => Some(Key::Right),
        Scancode::Left => Some(Key::TurnLeft),
        Scancode::Right => Some(Key::TurnRight),
        Scancode::Up => Some(Key::LookUp),
        Scancode::Down => Some(Key::LookDown),
        _ => None,
    }
}

pub struct Window {
    // Declared before the creator so it is dropped first.
    texture: Texture<'static>,
    _texture_creator: Box<TextureCreator<WindowContext>>,
    canvas: Canvas<sdl2::video::Window>,
    event_pump: sdl2::EventPump,
    format: PixelFormat,
    width: u32,
    height: u32,
}

impl Window {
    pub fn new(title: &str, width: u32, height: u32, format: PixelFormat) -> Result<Self, String> {
        let sdl_context = sdl2::init()?;
        let video_subsystem = sdl_context.video()?;

        let window = video_subsystem
            .window(title, width, height)
            .position_centered()
            .build()
            .map_err(|e| e.to_string())?;

        let canvas = window
            .into_canvas()
            .accelerated()
            .build()
            .map_err(|e| e.to_string())?;
        let texture_creator = Box::new(canvas.texture_creator());
        let event_pump = sdl_context.event_pump()?;

        // SAFETY: texture_creator is heap-allocated and lives as long as Window.
        // The texture field is declared first, so it is dropped before the creator.
        let texture_creator_ref: &'static TextureCreator<WindowContext> =
            unsafe { &*(texture_creator.as_ref() as *const _) };
        let mut texture = texture_creator_ref
            .create_texture_streaming(texture_format(format), width, height)
            .map_err(|e| e.to_string())?;
        texture.set_blend_mode(BlendMode::None);

        Ok(Self {
            texture,
            _texture_creator: texture_creator,
            canvas,
            event_pump,
            format,
            width,
            height,
        })
    }

    /// Drains pending events into `controls`.
    ///
    /// Quit and Escape clear the running flag; losing focus releases every
    /// held key.
    pub fn poll_input(&mut self, controls: &mut Controls) {
        for event in self.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => controls.quit(),
                Event::KeyDown {
                    scancode: Some(scancode),
                    ..
                } => {
                    if let Some(key) = key_for(scancode) {
                        controls.set_key(key, true);
                    }
                }
                Event::KeyUp {
                    scancode: Some(scancode),
                    ..
                } => {
                    if let Some(key) = key_for(scancode) {
                        controls.set_key(key, false);
                    }
                }
                Event::Window {
                    win_event: WindowEvent::FocusLost,
                    ..
                } => controls.release_all(),
                _ => {}
            }
        }
    }

    /// Uploads `buffer` and shows it. The buffer must match the window's
    /// size and channel order.
    pub fn present(&mut self, buffer: &PixelBuffer) -> Result<(), String> {
        if (buffer.width(), buffer.height(), buffer.format())
            != (self.width, self.height, self.format)
        {
            return Err(format!(
                "buffer is {}x{} {}, window expects {}x{} {}",
                buffer.width(),
                buffer.height(),
                buffer.format(),
                self.width,
                self.height,
                self.format
            ));
        }

        self.texture
            .update(None, buffer.as_bytes(), buffer.pitch())
            .map_err(|e| e.to_string())?;

        self.canvas.clear();
        self.canvas.copy(&self.texture, None, None)?;
        self.canvas.present();
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_fills_the_rest_of_the_budget() {
        let target = Duration::from_millis(16);
        assert_eq!(frame_delay(Duration::from_millis(10), target), Duration::from_millis(6));
        assert_eq!(frame_delay(Duration::ZERO, target), target);
    }

    #[test]
    fn overrun_frames_do_not_wait() {
        let target = Duration::from_millis(16);
        assert_eq!(frame_delay(Duration::from_millis(40), target), Duration::ZERO);
        assert_eq!(frame_delay(target, target), Duration::ZERO);
    }

    #[test]
    fn limiter_targets_the_frame_rate() {
        let limiter = FrameLimiter::new(60);
        let expected = 1.0 / 60.0;
        assert!((limiter.target().as_secs_f64() - expected).abs() < 1e-9);
        assert_eq!(FrameLimiter::new(0).target(), Duration::from_secs(1));
    }

    #[test]
    fn limiter_reports_frame_work_time() {
        let mut limiter = FrameLimiter::new(1000);
        limiter.begin_frame();
        let elapsed = limiter.end_frame();
        assert!(elapsed < Duration::from_secs(1));
    }

    #[test]
    fn movement_and_arrow_keys_are_mapped() {
        assert_eq!(key_for(Scancode::W), Some(Key::Forward));
        assert_eq!(key_for(Scancode::D), Some(Key::Right));
        assert_eq!(key_for(Scancode::Up), Some(Key::LookUp));
        assert_eq!(key_for(Scancode::Q), None);
    }

    #[test]
    fn texture_format_follows_channel_order() {
        assert_eq!(texture_format(PixelFormat::Rgba32), PixelFormatEnum::RGBA32);
        assert_eq!(texture_format(PixelFormat::Bgr24), PixelFormatEnum::BGR24);
    }
}
