//! Software-rendered particle viewer using `minifb`.
//!
//! Layout:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                                                      │
//! │            particle cloud (perspective,              │
//! │            additive splats)                          │
//! │                                                      │
//! ├──────────────────────────────────────────────────────┤
//! │ SET A (DEFAULT)   HEART  AMBIENT  ZOOM 1.00  HANDS 1 │
//! │ key legend                                           │
//! └──────────────────────────────────────────────────────┘
//! ```

use std::sync::mpsc::Sender;
use std::time::Duration;

use anyhow::{anyhow, Result};
use glam::{Mat3, Vec3};
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use morph_shapes::{pack_argb, Rgb};

use crate::source::SimInput;

// ════════════════════════════════════════════════════════════════════════════
// Layout and camera constants
// ════════════════════════════════════════════════════════════════════════════

/// Camera distance from the origin along +z.
pub const CAMERA_Z: f32 = 30.0;
/// Vertical field of view in degrees.
pub const FOV_Y_DEG: f32 = 75.0;
const NEAR:          f32   = 0.1;
/// Brightness of one splat; overlapping splats add up.
const SPLAT_GAIN:    f32   = 0.55;
const STATUS_H:      usize = 34;
const LABEL_SCALE:   usize = 2;
const BG_COLOR:      u32   = 0xFF05050A;
const TEXT_BG:       u32   = 0xFF0F1830;
const DETAIL_COLOR:  u32   = 0xFFEEEEEE;
const LEGEND_COLOR:  u32   = 0xFF888888;

const LEGEND: &str = "0-5 FINGERS  F FIST  U THUMBS UP  H HANDS  SPACE SHOW  ARROWS MOVE  [ ] SPREAD  N/P SET  F1-F8  Q QUIT";

/// Per-frame commands for the application, as opposed to simulated hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UiCommand {
    NextSet,
    PrevSet,
    /// Activate the set at this position in the registry.
    ActivateSet(usize),
    Quit,
}

/// Everything one frame needs to draw.
pub struct Scene<'a> {
    pub positions:    &'a [Vec3],
    pub colors:       &'a [Rgb],
    /// `(angle_x, angle_y)` in radians.
    pub angles:       (f32, f32),
    /// Set status label, drawn in `status_color`.
    pub status:       String,
    /// `0xRRGGBB`.
    pub status_color: u32,
    pub detail:       String,
}

// ════════════════════════════════════════════════════════════════════════════
// Projection
// ════════════════════════════════════════════════════════════════════════════

/// Rotation about X by `angle_x`, then about Y by `angle_y`.
pub fn rotation(angles: (f32, f32)) -> Mat3 {
    Mat3::from_rotation_y(angles.1) * Mat3::from_rotation_x(angles.0)
}

/// Project a rotated model-space point to pixel coordinates.  `None` when
/// the point is behind the near plane.
pub fn project(p: Vec3, width: usize, height: usize) -> Option<(f32, f32)> {
    let depth = CAMERA_Z - p.z;
    if depth <= NEAR {
        return None;
    }
    let focal = (height as f32 / 2.0) / (FOV_Y_DEG.to_radians() / 2.0).tan();
    Some((
        width as f32 / 2.0 + p.x / depth * focal,
        height as f32 / 2.0 - p.y / depth * focal,
    ))
}

/// Channel-wise saturating add, alpha forced opaque.
pub fn add_argb(a: u32, b: u32) -> u32 {
    let ch = |shift: u32| (((a >> shift) & 0xFF) + ((b >> shift) & 0xFF)).min(0xFF) << shift;
    0xFF000000 | ch(16) | ch(8) | ch(0)
}

// ════════════════════════════════════════════════════════════════════════════
// Key mapping
// ════════════════════════════════════════════════════════════════════════════

const MOVE_STEP:   f32 = 0.02;
const SPREAD_STEP: f32 = 0.05;

/// Keys that keep firing while held.
fn repeats(key: Key) -> bool {
    matches!(
        key,
        Key::Left | Key::Right | Key::Up | Key::Down | Key::LeftBracket | Key::RightBracket
    )
}

pub fn sim_input_for(key: Key) -> Option<SimInput> {
    Some(match key {
        Key::Key0 => SimInput::Fingers(0),
        Key::Key1 => SimInput::Fingers(1),
        Key::Key2 => SimInput::Fingers(2),
        Key::Key3 => SimInput::Fingers(3),
        Key::Key4 => SimInput::Fingers(4),
        Key::Key5 => SimInput::Fingers(5),
        Key::F     => SimInput::Fist,
        Key::U     => SimInput::ThumbsUp,
        Key::H     => SimInput::ToggleSecondHand,
        Key::Space => SimInput::ToggleVisible,
        // Image y grows downward.
        Key::Left  => SimInput::Move { dx: -MOVE_STEP, dy: 0.0 },
        Key::Right => SimInput::Move { dx: MOVE_STEP, dy: 0.0 },
        Key::Up    => SimInput::Move { dx: 0.0, dy: -MOVE_STEP },
        Key::Down  => SimInput::Move { dx: 0.0, dy: MOVE_STEP },
        Key::LeftBracket  => SimInput::Spread(-SPREAD_STEP),
        Key::RightBracket => SimInput::Spread(SPREAD_STEP),
        _ => return None,
    })
}

pub fn ui_command_for(key: Key) -> Option<UiCommand> {
    const SET_KEYS: [Key; 8] = [Key::F1, Key::F2, Key::F3, Key::F4, Key::F5, Key::F6, Key::F7, Key::F8];
    match key {
        Key::N => Some(UiCommand::NextSet),
        Key::P => Some(UiCommand::PrevSet),
        Key::Q | Key::Escape => Some(UiCommand::Quit),
        _ => SET_KEYS.iter().position(|&k| k == key).map(UiCommand::ActivateSet),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window:     Window,
    buf:        Vec<u32>,
    width:      usize,
    height:     usize,
    point_size: usize,
    /// Present only when the keyboard simulator supplies the hands.
    sim_tx:     Option<Sender<SimInput>>,
}

impl Visualizer {
    pub fn new(
        width: usize,
        height: usize,
        point_size: usize,
        sim_tx: Option<Sender<SimInput>>,
    ) -> Result<Self> {
        let mut window = Window::new(
            "Hand Morph",
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        ).map_err(|e| anyhow!("creating {}x{} window: {}", width, height, e))?;

        window.limit_update_rate(Some(Duration::from_millis(16))); // ~60fps

        Ok(Visualizer {
            window,
            buf: vec![BG_COLOR; width * height],
            width,
            height,
            point_size,
            sim_tx,
        })
    }

    pub fn is_open(&self) -> bool { self.window.is_open() }

    /// Forward simulation keys to the simulator and return app commands.
    pub fn poll_input(&mut self) -> Vec<UiCommand> {
        if !self.window.is_open() {
            return vec![UiCommand::Quit];
        }

        let held    = self.window.get_keys_pressed(KeyRepeat::Yes);
        let pressed = self.window.get_keys_pressed(KeyRepeat::No);
        let keys = held.into_iter().filter(|&k| repeats(k))
            .chain(pressed.into_iter().filter(|&k| !repeats(k)));

        let mut commands = Vec::new();
        for key in keys {
            if let Some(cmd) = ui_command_for(key) {
                commands.push(cmd);
            } else if let (Some(tx), Some(input)) = (&self.sim_tx, sim_input_for(key)) {
                let _ = tx.send(input);
            }
        }
        commands
    }

    /// Render one frame.
    pub fn render(&mut self, scene: &Scene<'_>) {
        self.buf.fill(BG_COLOR);

        // ── Particles ─────────────────────────────────────────────────────
        let rot = rotation(scene.angles);
        let view_h = self.height.saturating_sub(STATUS_H);
        for (&p, &rgb) in scene.positions.iter().zip(scene.colors) {
            if let Some((sx, sy)) = project(rot * p, self.width, view_h) {
                let color = pack_argb([rgb[0] * SPLAT_GAIN, rgb[1] * SPLAT_GAIN, rgb[2] * SPLAT_GAIN]);
                self.splat(sx, sy, view_h, color);
            }
        }

        // ── Status bar ────────────────────────────────────────────────────
        let status_y = view_h;
        self.fill_rect(0, status_y, self.width, STATUS_H, TEXT_BG);
        let set_color = 0xFF000000 | scene.status_color;
        let x = self.draw_label(&scene.status, 10, status_y + 5, set_color);
        self.draw_label(&scene.detail, x + 24, status_y + 5, DETAIL_COLOR);

        // ── Key legend ────────────────────────────────────────────────────
        self.draw_label(LEGEND, 10, status_y + 20, LEGEND_COLOR);

        self.window.update_with_buffer(&self.buf, self.width, self.height).ok();
    }

    // ── Primitive drawing helpers ─────────────────────────────────────────

    fn splat(&mut self, sx: f32, sy: f32, max_y: usize, color: u32) {
        let r = self.point_size as isize;
        let (cx, cy) = (sx.round() as isize, sy.round() as isize);
        for y in (cy - r)..=(cy + r) {
            if y < 0 || y as usize >= max_y { continue; }
            for x in (cx - r)..=(cx + r) {
                if x < 0 || x as usize >= self.width { continue; }
                let i = y as usize * self.width + x as usize;
                self.buf[i] = add_argb(self.buf[i], color);
            }
        }
    }

    fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        for row in y..(y+h).min(self.height) {
            for col in x..(x+w).min(self.width) {
                self.buf[row * self.width + col] = color;
            }
        }
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.width && y < self.height {
            self.buf[y * self.width + x] = color;
        }
    }

    /// Draw `text` with the 3×5 font at [`LABEL_SCALE`]; returns the x just
    /// past the last character.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, color: u32) -> usize {
        let advance = 4 * LABEL_SCALE; // 3 wide + 1 gap
        let mut cx = x;
        for ch in text.chars() {
            if cx + advance > self.width { break; }
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) == 0 { continue; }
                    for dy in 0..LABEL_SCALE {
                        for dx in 0..LABEL_SCALE {
                            self.set_pixel(cx + col * LABEL_SCALE + dx, y + row * LABEL_SCALE + dy, color);
                        }
                    }
                }
            }
            cx += advance;
        }
        cx
    }
}

// ────────────────────────────────────────────────────────────────────────────
// 3×5 bitmap font: only the characters the status bar and legend use
// ────────────────────────────────────────────────────────────────────────────

/// Rows top to bottom, bit 2 is the left column.  Letters are stored once,
/// in upper case.
const GLYPHS: &[(char, [u8; 5])] = &[
    ('A', [0b010, 0b101, 0b111, 0b101, 0b101]),
    ('B', [0b110, 0b101, 0b110, 0b101, 0b110]),
    ('C', [0b011, 0b100, 0b100, 0b100, 0b011]),
    ('D', [0b110, 0b101, 0b101, 0b101, 0b110]),
    ('E', [0b111, 0b100, 0b110, 0b100, 0b111]),
    ('F', [0b111, 0b100, 0b110, 0b100, 0b100]),
    ('G', [0b011, 0b100, 0b101, 0b101, 0b011]),
    ('H', [0b101, 0b101, 0b111, 0b101, 0b101]),
    ('I', [0b111, 0b010, 0b010, 0b010, 0b111]),
    ('J', [0b001, 0b001, 0b001, 0b101, 0b010]),
    ('K', [0b101, 0b110, 0b100, 0b110, 0b101]),
    ('L', [0b100, 0b100, 0b100, 0b100, 0b111]),
    ('M', [0b101, 0b111, 0b111, 0b101, 0b101]),
    ('N', [0b110, 0b101, 0b101, 0b101, 0b101]),
    ('O', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('P', [0b110, 0b101, 0b110, 0b100, 0b100]),
    ('Q', [0b010, 0b101, 0b101, 0b110, 0b011]),
    ('R', [0b110, 0b101, 0b110, 0b101, 0b101]),
    ('S', [0b011, 0b100, 0b010, 0b001, 0b110]),
    ('T', [0b111, 0b010, 0b010, 0b010, 0b010]),
    ('U', [0b101, 0b101, 0b101, 0b101, 0b011]),
    ('V', [0b101, 0b101, 0b101, 0b101, 0b010]),
    ('W', [0b101, 0b101, 0b111, 0b111, 0b101]),
    ('X', [0b101, 0b101, 0b010, 0b101, 0b101]),
    ('Y', [0b101, 0b101, 0b010, 0b010, 0b010]),
    ('Z', [0b111, 0b001, 0b010, 0b100, 0b111]),
    ('0', [0b010, 0b101, 0b101, 0b101, 0b010]),
    ('1', [0b010, 0b110, 0b010, 0b010, 0b111]),
    ('2', [0b110, 0b001, 0b010, 0b100, 0b111]),
    ('3', [0b110, 0b001, 0b010, 0b001, 0b110]),
    ('4', [0b101, 0b101, 0b111, 0b001, 0b001]),
    ('5', [0b111, 0b100, 0b110, 0b001, 0b110]),
    ('6', [0b011, 0b100, 0b110, 0b101, 0b010]),
    ('7', [0b111, 0b001, 0b010, 0b010, 0b010]),
    ('8', [0b010, 0b101, 0b010, 0b101, 0b010]),
    ('9', [0b010, 0b101, 0b011, 0b001, 0b110]),
    ('.', [0b000, 0b000, 0b000, 0b000, 0b010]),
    ('-', [0b000, 0b000, 0b111, 0b000, 0b000]),
    ('/', [0b001, 0b001, 0b010, 0b100, 0b100]),
    ('(', [0b001, 0b010, 0b010, 0b010, 0b001]),
    (')', [0b100, 0b010, 0b010, 0b010, 0b100]),
    ('[', [0b011, 0b010, 0b010, 0b010, 0b011]),
    (']', [0b110, 0b010, 0b010, 0b010, 0b110]),
    (' ', [0b000, 0b000, 0b000, 0b000, 0b000]),
];

/// Drawn for characters missing from [`GLYPHS`].
const MISSING_GLYPH: [u8; 5] = [0b000, 0b000, 0b010, 0b000, 0b000];

fn char_glyph(c: char) -> [u8; 5] {
    let c = c.to_ascii_uppercase();
    GLYPHS
        .iter()
        .find(|(g, _)| *g == c)
        .map_or(MISSING_GLYPH, |&(_, bits)| bits)
}
