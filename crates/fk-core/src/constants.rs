//! Global constants for fk-core

/// Centimetres per inch (all model lengths are in cm)
pub const CM_PER_INCH: f32 = 2.54;

/// Nominal stock thickness in inches
pub const STD_THICKNESS_IN: f32 = 2.0;

/// Wood colour for structural parts (RGBA)
pub const WOOD_COLOR: [f32; 4] = [203.0 / 255.0, 175.0 / 255.0, 117.0 / 255.0, 1.0];

/// Colour for the table top (RGBA)
pub const WHITE_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Two parts whose bounds overlap by less than this are only touching
pub const CONTACT_TOLERANCE: f32 = 1e-3;

/// Convert inches to centimetres
pub fn in_to_cm(inches: f32) -> f32 {
    inches * CM_PER_INCH
}
