//! # hand_morph
//!
//! Hand-gesture controller for a morphing particle cloud: thousands of
//! particles ease toward procedurally generated 3-D shapes, steered by the
//! hands in front of the camera (or the keyboard simulator).
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Hands | Action |
//! |---|---|---|
//! | Raise 1–5 fingers | One, or two showing the same count | Morph to that shape of the active set |
//! | Thumbs up (held) | One | Advance to the next set |
//! | Fist | One | Rotation mode; orientation holds still |
//! | Fist + open hand | Two | Rotation mode; the open hand turns the cloud |
//! | Spread open hands | Two | Zoom in proportion to wrist distance |
//! | Move palm | One | Steer the ambient spin |
//! | Hands leave | None | Orientation decays to centre, zoom eases to 1 |
//!
//! ## Feature flags
//!
//! * (default): **simulation mode**, keyboard shortcuts drive synthetic hands.
//! * `leap`: **hardware mode**, polls a real LeapMotion controller via LeapC.
//!
//! ### Keyboard
//!
//! | Key | Effect |
//! |---|---|
//! | `0`–`5` | Simulated finger count |
//! | `F` / `U` | Simulated fist / thumbs-up |
//! | `H` | Toggle the second hand |
//! | `Space` | Show or withdraw the hands |
//! | Arrows | Move the palm |
//! | `[` / `]` | Close / spread two hands |
//! | `N` / `P` | Next / previous set |
//! | `F1`–`F8` | Activate set by position |
//! | `Q` / `Escape` | Quit |

pub mod animator;
pub mod source;
pub mod visualizer;
pub mod config;
pub mod app;
