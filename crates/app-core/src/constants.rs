use glam::Vec3;

// Shared visual/gesture tuning constants used by the core fields and the front-end.

// Populations
pub const FOLIAGE_COUNT: usize = 15_000;
pub const ORNAMENT_COUNT: usize = 300;

// Tree (formed) and chaos shapes, world units
pub const TREE_HEIGHT: f32 = 12.0;
pub const TREE_RADIUS: f32 = 5.0;
pub const CHAOS_RADIUS: f32 = 15.0;
pub const ORNAMENT_CHAOS_SCALE: f32 = 1.2; // ornaments scatter a little wider than foliage

// Foliage surface thickness and sprite size ranges (min inclusive, max exclusive)
pub const FOLIAGE_THICKNESS: (f32, f32) = (0.8, 1.2);
pub const FOLIAGE_SIZE: (f32, f32) = (0.05, 0.20);

// Progress smoothing, per second. The two fields deliberately run at different rates.
pub const FOLIAGE_SMOOTHING_RATE: f32 = 2.5;
pub const ORNAMENT_SMOOTHING_RATE: f32 = 2.0;

// Foliage drift while scattered
pub const FOLIAGE_NOISE_AMPLITUDE: f32 = 0.2;
pub const FOLIAGE_NOISE_THRESHOLD: f32 = 0.1; // no drift at or below this progress

// Ornament per-type tuning
pub const BOX_WEIGHT: f32 = 1.5;
pub const BALL_WEIGHT: f32 = 1.0;
pub const LIGHT_WEIGHT: f32 = 0.5;
pub const BOX_SCALE: f32 = 0.4;
pub const BALL_SCALE: f32 = 0.3;
pub const LIGHT_SCALE: f32 = 0.1;
pub const SPIN_RATE_X: f32 = 0.2; // radians per second per unit weight
pub const SPIN_RATE_Y: f32 = 0.3;

// Gesture
pub const OPEN_HAND_THRESHOLD: f32 = 0.08; // normalized image-plane distance tip..MCP
pub const PAN_SCALE_X: f32 = 10.0;
pub const PAN_SCALE_Y: f32 = 5.0;
pub const CAMERA_WIDTH: u32 = 640;
pub const CAMERA_HEIGHT: u32 = 480;
pub const CAMERA_FPS: f32 = 30.0;

// Palette (sRGB hex)
pub const EMERALD_DARK: u32 = 0x013220;
pub const EMERALD_BRIGHT: u32 = 0x025230;
pub const GOLD_LUXURY: u32 = 0xD4AF37;
pub const GOLD_HIGHLIGHT: u32 = 0xFFD700;
pub const BACKGROUND: u32 = 0x011A11;
pub const TRUNK_BROWN: u32 = 0x2D1B0D;
pub const ORNAMENT_PALETTE: [u32; 4] = [
    0xD4AF37, // gold
    0xFFFFFF, // white/diamond
    0xCC0000, // imperial red
    0x0044BB, // royal blue
];

// Foliage sprite color ramp, blended by size * 0.5
pub const FOLIAGE_COLOR_LOW: [f32; 3] = [0.01, 0.2, 0.12];
pub const FOLIAGE_COLOR_HIGH: [f32; 3] = [0.83, 0.68, 0.21];
pub const POINT_SIZE_SCALE: f32 = 300.0; // on-screen diameter = size * scale / depth

// Camera framing
pub const CAMERA_POSITION: [f32; 3] = [0.0, 4.0, 20.0];
pub const CAMERA_FOV_DEG: f32 = 45.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 200.0;
pub const ZOOM_MIN_DISTANCE: f32 = 10.0;
pub const ZOOM_MAX_DISTANCE: f32 = 35.0;
pub const AUTO_ROTATE_SPEED: f32 = 0.5;

#[inline]
pub fn camera_position_vec3() -> Vec3 {
    Vec3::from(CAMERA_POSITION)
}

/// Split a `0xRRGGBB` value into sRGB components in \[0, 1\].
#[inline]
pub fn hex_to_srgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xFF) as f32 / 255.0,
        ((hex >> 8) & 0xFF) as f32 / 255.0,
        (hex & 0xFF) as f32 / 255.0,
    ]
}

/// Convert a `0xRRGGBB` value to linear RGB for shading.
#[inline]
pub fn hex_to_linear(hex: u32) -> [f32; 3] {
    hex_to_srgb(hex).map(srgb_to_linear)
}

#[inline]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}
