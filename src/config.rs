// Configuration file, All measurements in real-world meters (1 unit = 1 meter)
// This controls the initial generation parameter settings

// Ground area the city is generated on, centered on the origin
pub const GROUND_HALF_EXTENT: f32 = 250.0;  // half of the ground square side
pub const BOUNDARY_MARGIN: f32 = 20.0;      // buildings stay this far inside the ground edge

pub const FLOOR_HEIGHT: f32 = 3.0;  // one storey

// Target towers (the only buildings that get RF points)
pub const TOWER_COUNT: usize = 3;
pub const TOWER_ANCHORS: [[f32; 2]; TOWER_COUNT] = [
    [0.0, 0.0],       // center
    [-130.0, -120.0], // back left
    [130.0, 110.0],   // front right
];
pub const TOWER_HEIGHT_MIN: f32 = 100.0;    // 33 floors
pub const TOWER_HEIGHT_SPREAD: f32 = 30.0;  // up to 130m
pub const TOWER_FOOTPRINT_MIN: f32 = 40.0;  // square footprint side
pub const TOWER_FOOTPRINT_SPREAD: f32 = 20.0;

// Background buildings
pub const LOWRISE_COUNT_MIN: usize = 12;
pub const LOWRISE_COUNT_SPREAD: usize = 4;  // 12-15 candidates
pub const LOWRISE_HEIGHT_MIN: f32 = 10.0;
pub const LOWRISE_HEIGHT_SPREAD: f32 = 30.0;
pub const LOWRISE_FOOTPRINT_MIN: f32 = 12.0;
pub const LOWRISE_FOOTPRINT_SPREAD: f32 = 10.0;

// Jittered placement grid for background buildings
pub const GRID_COLUMNS: usize = 6;
pub const GRID_SPACING_MIN: f32 = 45.0;
pub const GRID_SPACING_SPREAD: f32 = 10.0;
pub const GRID_JITTER: f32 = 16.0;          // full width of the per-axis jitter

// Placement constraints
pub const TOWER_CLEARANCE: f32 = 60.0;      // min center distance from any tower anchor
pub const FOOTPRINT_MARGIN: f32 = 4.0;      // min gap between footprints
pub const MAX_PLACEMENT_ATTEMPTS: usize = 50;

// RF point sampling
pub const POINTS_PER_BUILDING: usize = 200;
pub const WALL_COUNT: usize = 4;
pub const HORIZONTAL_LANES: usize = 10;     // distinct horizontal positions per wall
pub const SURFACE_OFFSET: f32 = 0.15;       // 15cm off the wall

// Viewer parameters, these are cosmetic only
pub const MARKER_RADIUS: f32 = 0.6;
pub const SIGNAL_BAND_BINS: usize = 16;     // vertical resolution of the wall overlay
pub const SIGNAL_BAND_OFFSET: f32 = 0.5;    // overlay distance from the wall
pub const FLOOR_PANEL_SECONDS: f32 = 3.0;   // floor metrics window auto-close
pub const INITIAL_SEED: u64 = 1337;
pub const SIGNAL_BAND_WIDTH: f32 = 3.0;
