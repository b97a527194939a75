//! Pixel and geometric filters.
//!
//! Every filter borrows its input and returns a new grid. [`FilterKind`] is
//! the lookup table the CLI menu is built from; [`Filter`] is a kind with its
//! parameter bound.

mod color;
mod geometry;

pub use color::{
    CLARENDON_DARK_THRESHOLD, CLARENDON_LIGHT_THRESHOLD, HIGH_CONTRAST_THRESHOLD,
    PRIMARIES_BLACK_SUM, PRIMARIES_WHITE_SUM, clarendon, darken, grayscale, high_contrast,
    lighten, primaries, vignette,
};
pub use geometry::{EnlargeMode, Rotation, enlarge, rotate, rotate_90};

use core::fmt;
use core::num::NonZeroU32;
use core::str::FromStr;

use crate::error::BitmapError;
use crate::pixel::PixelGrid;

/// A filter with its parameter bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Filter {
    Vignette,
    Clarendon { factor: f64 },
    Grayscale,
    Rotate90,
    Rotate(Rotation),
    Enlarge { scale: NonZeroU32, mode: EnlargeMode },
    HighContrast,
    Lighten { factor: f64 },
    Darken { factor: f64 },
    Primaries,
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::Vignette => FilterKind::Vignette,
            Filter::Clarendon { .. } => FilterKind::Clarendon,
            Filter::Grayscale => FilterKind::Grayscale,
            Filter::Rotate90 => FilterKind::Rotate90,
            Filter::Rotate(_) => FilterKind::Rotate,
            Filter::Enlarge { .. } => FilterKind::Enlarge,
            Filter::HighContrast => FilterKind::HighContrast,
            Filter::Lighten { .. } => FilterKind::Lighten,
            Filter::Darken { .. } => FilterKind::Darken,
            Filter::Primaries => FilterKind::Primaries,
        }
    }

    /// Replace the enlarge mode. Other filters are returned unchanged.
    pub fn with_enlarge_mode(self, mode: EnlargeMode) -> Self {
        match self {
            Filter::Enlarge { scale, .. } => Filter::Enlarge { scale, mode },
            other => other,
        }
    }

    /// Run the filter. Only [`Filter::Enlarge`] can fail (output overflow).
    pub fn apply(&self, grid: &PixelGrid) -> Result<PixelGrid, BitmapError> {
        log::trace!("applying {self:?} to {}x{}", grid.width(), grid.height());
        Ok(match *self {
            Filter::Vignette => vignette(grid),
            Filter::Clarendon { factor } => clarendon(grid, factor),
            Filter::Grayscale => grayscale(grid),
            Filter::Rotate90 => rotate_90(grid),
            Filter::Rotate(rotation) => rotate(grid, rotation),
            Filter::Enlarge { scale, mode } => enlarge(grid, scale, mode)?,
            Filter::HighContrast => high_contrast(grid),
            Filter::Lighten { factor } => lighten(grid, factor),
            Filter::Darken { factor } => darken(grid, factor),
            Filter::Primaries => primaries(grid),
        })
    }
}

/// What kind of argument a filter takes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamKind {
    None,
    /// Real-valued scaling factor.
    Factor,
    /// Signed count of clockwise quarter turns.
    Turns,
    /// Positive integer scale.
    Scale,
}

impl ParamKind {
    /// Prompt text for interactive input.
    pub fn prompt(self) -> Option<&'static str> {
        match self {
            ParamKind::None => None,
            ParamKind::Factor => Some("Enter scaling factor"),
            ParamKind::Turns => Some("Enter number of 90 degree rotations"),
            ParamKind::Scale => Some("Enter scale"),
        }
    }
}

/// Filter identifier without a parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FilterKind {
    Vignette,
    Clarendon,
    Grayscale,
    Rotate90,
    Rotate,
    Enlarge,
    HighContrast,
    Lighten,
    Darken,
    Primaries,
}

struct MenuEntry {
    kind: FilterKind,
    name: &'static str,
    label: &'static str,
    param: ParamKind,
    default_param: Option<&'static str>,
}

// Same order as `FilterKind` variants; entry `i` is menu number `i + 1`.
static MENU: [MenuEntry; 10] = [
    MenuEntry {
        kind: FilterKind::Vignette,
        name: "vignette",
        label: "Vignette",
        param: ParamKind::None,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Clarendon,
        name: "clarendon",
        label: "Clarendon",
        param: ParamKind::Factor,
        default_param: Some("0.3"),
    },
    MenuEntry {
        kind: FilterKind::Grayscale,
        name: "grayscale",
        label: "Grayscale",
        param: ParamKind::None,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Rotate90,
        name: "rotate90",
        label: "Rotate 90 degrees",
        param: ParamKind::None,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Rotate,
        name: "rotate",
        label: "Rotate multiple 90 degrees",
        param: ParamKind::Turns,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Enlarge,
        name: "enlarge",
        label: "Enlarge",
        param: ParamKind::Scale,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::HighContrast,
        name: "high-contrast",
        label: "High contrast",
        param: ParamKind::None,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Lighten,
        name: "lighten",
        label: "Lighten",
        param: ParamKind::Factor,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Darken,
        name: "darken",
        label: "Darken",
        param: ParamKind::Factor,
        default_param: None,
    },
    MenuEntry {
        kind: FilterKind::Primaries,
        name: "primaries",
        label: "Black, white, red, green, blue",
        param: ParamKind::None,
        default_param: None,
    },
];

impl FilterKind {
    /// All kinds in menu order.
    pub const ALL: [FilterKind; 10] = [
        FilterKind::Vignette,
        FilterKind::Clarendon,
        FilterKind::Grayscale,
        FilterKind::Rotate90,
        FilterKind::Rotate,
        FilterKind::Enlarge,
        FilterKind::HighContrast,
        FilterKind::Lighten,
        FilterKind::Darken,
        FilterKind::Primaries,
    ];

    fn entry(self) -> &'static MenuEntry {
        &MENU[self as usize]
    }

    /// 1-based menu number.
    pub fn menu_number(self) -> u8 {
        self as u8 + 1
    }

    /// Stable lowercase name, used on the command line.
    pub fn name(self) -> &'static str {
        self.entry().name
    }

    /// Menu text.
    pub fn label(self) -> &'static str {
        self.entry().label
    }

    pub fn param(self) -> ParamKind {
        self.entry().param
    }

    /// Parameter used when the caller supplies none.
    pub fn default_param(self) -> Option<&'static str> {
        self.entry().default_param
    }

    /// Look up by 1-based menu number.
    pub fn from_menu(number: u8) -> Option<Self> {
        let index = usize::from(number).checked_sub(1)?;
        MENU.get(index).map(|e| e.kind)
    }

    /// Look up by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Self> {
        MENU.iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.kind)
    }

    /// Bind a parameter.
    ///
    /// `raw` falls back to [`FilterKind::default_param`]. Filters taking no
    /// parameter ignore `raw`.
    pub fn with_param(self, raw: Option<&str>) -> Result<Filter, BitmapError> {
        let param = self.param();
        let raw = match (param, raw.or(self.default_param())) {
            (ParamKind::None, _) => "",
            (_, Some(raw)) => raw.trim(),
            (_, None) => {
                return Err(BitmapError::InvalidParameter(alloc::format!(
                    "{} requires a parameter",
                    self.name()
                )));
            }
        };

        Ok(match self {
            FilterKind::Vignette => Filter::Vignette,
            FilterKind::Clarendon => Filter::Clarendon {
                factor: parse_factor(raw)?,
            },
            FilterKind::Grayscale => Filter::Grayscale,
            FilterKind::Rotate90 => Filter::Rotate90,
            FilterKind::Rotate => Filter::Rotate(Rotation::from_turns(parse_turns(raw)?)),
            FilterKind::Enlarge => Filter::Enlarge {
                scale: parse_scale(raw)?,
                mode: EnlargeMode::default(),
            },
            FilterKind::HighContrast => Filter::HighContrast,
            FilterKind::Lighten => Filter::Lighten {
                factor: parse_factor(raw)?,
            },
            FilterKind::Darken => Filter::Darken {
                factor: parse_factor(raw)?,
            },
            FilterKind::Primaries => Filter::Primaries,
        })
    }
}

fn parse_factor(raw: &str) -> Result<f64, BitmapError> {
    match raw.parse::<f64>() {
        Ok(factor) if factor.is_finite() => Ok(factor),
        _ => Err(BitmapError::InvalidParameter(alloc::format!(
            "scaling factor must be a finite number, got {raw:?}"
        ))),
    }
}

fn parse_turns(raw: &str) -> Result<i32, BitmapError> {
    raw.parse().map_err(|_| {
        BitmapError::InvalidParameter(alloc::format!(
            "rotation count must be an integer, got {raw:?}"
        ))
    })
}

fn parse_scale(raw: &str) -> Result<NonZeroU32, BitmapError> {
    raw.parse().map_err(|_| {
        BitmapError::InvalidParameter(alloc::format!(
            "scale must be a positive integer, got {raw:?}"
        ))
    })
}

impl FromStr for FilterKind {
    type Err = BitmapError;

    /// Accepts a menu number (`"3"`) or a name (`"grayscale"`).
    fn from_str(s: &str) -> Result<Self, BitmapError> {
        let s = s.trim();
        let found = match s.parse::<u8>() {
            Ok(number) => Self::from_menu(number),
            Err(_) => Self::from_name(s),
        };
        found.ok_or_else(|| {
            BitmapError::InvalidParameter(alloc::format!("no filter named or numbered {s:?}"))
        })
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
