/// Minimum pixel count (h*w) to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum frame count to use frame-level Rayon parallelism.
pub const PARALLEL_FRAME_THRESHOLD: usize = 4;

/// Small epsilon below which a cross-power magnitude is treated as zero.
pub const CROSS_POWER_EPSILON: f64 = 1e-12;

/// Cross-power bins weaker than this fraction of the strongest bin carry no
/// usable phase and are dropped before normalization.
pub const CROSS_POWER_RELATIVE_FLOOR: f64 = 1e-9;

/// Default number of neighbour steps taken while descending the alignment
/// error from the correlation peak.
pub const DEFAULT_ERROR_DESCENT_STEPS: usize = 16;

/// ITU-R BT.709 luminance coefficient for the red channel.
pub const LUMINANCE_R: f32 = 0.2125;

/// ITU-R BT.709 luminance coefficient for the green channel.
pub const LUMINANCE_G: f32 = 0.7154;

/// ITU-R BT.709 luminance coefficient for the blue channel.
pub const LUMINANCE_B: f32 = 0.0721;

/// Marker name of the nuclear-stain reference channel.
pub const DEFAULT_REFERENCE_MARKER: &str = "DAPI";

/// File extensions scanned in the input directory (case-insensitive).
pub const DEFAULT_FRAME_EXTENSIONS: [&str; 2] = ["tif", "tiff"];

/// Name of the optional ROI manifest inside the input directory.
pub const DEFAULT_MANIFEST_NAME: &str = "manifest.json";

/// Required distance (px) between an ROI box and every frame edge.
pub const DEFAULT_ROI_MARGIN: usize = 100;

/// Largest frame dimension correlated at full resolution. Larger frames are
/// stride-subsampled by `max_dim / limit + 1`.
pub const DEFAULT_MAX_CORRELATION_DIM: usize = 10_000;

/// Width (in downsampled pixels) of the window searched by upsampled
/// refinement around the coarse correlation peak.
pub const UPSAMPLE_SEARCH_WINDOW: f64 = 1.5;

/// File name of the registration log written into the output directory.
pub const DEFAULT_LOG_FILE: &str = "registration.log";

/// Default share of the available memory a batch may plan to use.
pub const DEFAULT_MEMORY_FRACTION: f64 = 0.8;

/// Working bytes per canvas pixel for one in-flight frame: f32 planes for up
/// to four channels in decoded, padded and shifted form, or the gray plane
/// with its complex spectra during estimation.
pub const WORKING_BYTES_PER_PIXEL: u64 = 64;
