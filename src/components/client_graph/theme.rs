//! Visual theming for the client graph.
//!
//! Provides the fixed group palette plus background, link, and node style
//! configuration.

/// RGBA color representation.
#[derive(Clone, Copy, Debug)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}
}

/// Node fill colors indexed by a node's group.
#[derive(Clone, Debug)]
pub struct GroupPalette {
	pub colors: Vec<Color>,
}

impl GroupPalette {
	/// The classic two-group palette: green for the first group, orange for
	/// the second.
	pub fn classic() -> Self {
		Self {
			colors: vec![
				Color::rgb(0, 204, 0),    // #00cc00
				Color::rgb(255, 127, 14), // #ff7f0e
			],
		}
	}

	/// Cooler variant of the same split for the midnight theme.
	pub fn frost() -> Self {
		Self {
			colors: vec![
				Color::rgb(80, 200, 120),  // Emerald
				Color::rgb(235, 155, 80),  // Soft amber
			],
		}
	}

	pub fn get(&self, group: u8) -> Color {
		self.colors[group as usize % self.colors.len()]
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
}

/// Link visual style.
#[derive(Clone, Debug)]
pub struct LinkStyle {
	/// Base link color
	pub color: Color,
	/// Color links blend towards while their endpoint is hovered
	pub highlight_color: Color,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Ring color for pinned (sticky) nodes
	pub sticky_ring: Color,
	/// Label text color
	pub label: Color,
	/// Label text color while highlighted
	pub label_highlight: Color,
	/// Label font
	pub label_font: &'static str,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub link: LinkStyle,
	pub node: NodeStyle,
	pub palette: GroupPalette,
}

impl Theme {
	/// Clean dark theme with the classic group colors (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				highlight_color: Color::rgba(220, 80, 70, 0.9),
			},
			node: NodeStyle {
				use_gradient: true,
				sticky_ring: Color::rgba(255, 255, 255, 0.7),
				label: Color::rgba(255, 255, 255, 0.85),
				label_highlight: Color::rgba(255, 235, 180, 0.95),
				label_font: "12px sans-serif",
			},
			palette: GroupPalette::classic(),
		}
	}

	/// Elegant dark theme with subtler group colors
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
			},
			link: LinkStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				highlight_color: Color::rgba(200, 90, 80, 0.9),
			},
			node: NodeStyle {
				use_gradient: true,
				sticky_ring: Color::rgba(255, 255, 255, 0.6),
				label: Color::rgba(225, 230, 240, 0.8),
				label_highlight: Color::rgba(255, 225, 170, 0.95),
				label_font: "12px sans-serif",
			},
			palette: GroupPalette::frost(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
