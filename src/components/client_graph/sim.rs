//! Force simulation driving node positions.
//!
//! The canvas state talks to the physics through the narrow [`LayoutEngine`]
//! trait: load bodies and springs, pull one `tick` per animation frame, read
//! positions back. Keeping the surface this small lets the physics be
//! replaced without touching the weight mapping or interaction code.
//!
//! [`SpringLayout`] is the default engine. It runs a damped position-Verlet
//! integration with three forces per step: weak gravity towards the canvas
//! center, pairwise charge repulsion falling off with squared distance, and
//! Gauss-Seidel relaxation of each spring towards its rest length, weighted
//! by node degree so well-connected nodes move less. A cooling factor decays
//! the whole system each step and the simulation stops on its own once it
//! drops below the settling threshold.

/// A point body in the simulation.
#[derive(Clone, Debug)]
pub struct Body {
	pub x: f64,
	pub y: f64,
	/// Previous position; the Verlet step derives velocity from it.
	px: f64,
	py: f64,
	/// Pinned bodies snap back to their held position every step.
	pub pinned: bool,
	/// Incident spring count, used to weight spring relaxation.
	degree: u32,
}

impl Body {
	pub fn at(x: f64, y: f64) -> Self {
		Self {
			x,
			y,
			px: x,
			py: y,
			pinned: false,
			degree: 0,
		}
	}
}

/// A spring between two bodies with a preferred rest length.
#[derive(Clone, Debug)]
pub struct Spring {
	pub source: usize,
	pub target: usize,
	pub rest_length: f64,
}

/// Tunable constants for [`SpringLayout`].
#[derive(Clone, Debug)]
pub struct SpringParams {
	/// Pull towards the canvas center.
	pub gravity: f64,
	/// Pairwise repulsion. Negative pushes bodies apart.
	pub charge: f64,
	/// Spring stiffness.
	pub spring_strength: f64,
	/// Velocity retained across steps.
	pub friction: f64,
	/// Per-step decay of the annealing temperature.
	pub cooling: f64,
	/// Temperature after `start`/`resume`.
	pub start_alpha: f64,
	/// The simulation stops once the temperature falls below this.
	pub min_alpha: f64,
}

impl Default for SpringParams {
	fn default() -> Self {
		Self {
			gravity: 0.05,
			charge: -150.0,
			spring_strength: 1.0,
			friction: 0.9,
			cooling: 0.99,
			start_alpha: 0.1,
			min_alpha: 0.005,
		}
	}
}

/// Minimal surface the canvas state needs from a physics engine.
pub trait LayoutEngine {
	/// Replace the simulated bodies and springs wholesale.
	fn load(&mut self, bodies: Vec<Body>, springs: Vec<Spring>);
	/// Update the canvas dimensions the gravity center derives from.
	fn set_size(&mut self, width: f64, height: f64);
	/// Heat up and run.
	fn start(&mut self);
	/// Reheat a settled simulation, e.g. after a drag.
	fn resume(&mut self);
	/// Whether `tick` still advances anything.
	fn running(&self) -> bool;
	/// Advance one step. Returns false once the simulation has settled.
	fn tick(&mut self) -> bool;
	fn bodies(&self) -> &[Body];
	fn bodies_mut(&mut self) -> &mut [Body];
	/// Pin or release a body at its current position.
	fn set_pinned(&mut self, index: usize, pinned: bool);
	/// Teleport a body, discarding its accumulated velocity.
	fn move_body(&mut self, index: usize, x: f64, y: f64);
}

/// Default spring-charge-gravity engine.
pub struct SpringLayout {
	params: SpringParams,
	bodies: Vec<Body>,
	springs: Vec<Spring>,
	width: f64,
	height: f64,
	alpha: f64,
	running: bool,
}

impl SpringLayout {
	pub fn new(width: f64, height: f64) -> Self {
		Self::with_params(SpringParams::default(), width, height)
	}

	pub fn with_params(params: SpringParams, width: f64, height: f64) -> Self {
		Self {
			params,
			bodies: Vec::new(),
			springs: Vec::new(),
			width,
			height,
			alpha: 0.0,
			running: false,
		}
	}

	fn relax_springs(&mut self) {
		for spring in &self.springs {
			let (s, t) = (spring.source, spring.target);
			let dx = self.bodies[t].x - self.bodies[s].x;
			let dy = self.bodies[t].y - self.bodies[s].y;
			let len_sq = dx * dx + dy * dy;
			if len_sq == 0.0 {
				continue;
			}
			let len = len_sq.sqrt();
			let f = self.alpha * self.params.spring_strength * (len - spring.rest_length) / len;
			let (fx, fy) = (dx * f, dy * f);

			// The lighter end of the spring absorbs more of the correction.
			let degrees = (self.bodies[s].degree + self.bodies[t].degree) as f64;
			let k = self.bodies[s].degree as f64 / degrees;
			self.bodies[t].x -= fx * k;
			self.bodies[t].y -= fy * k;
			let k = 1.0 - k;
			self.bodies[s].x += fx * k;
			self.bodies[s].y += fy * k;
		}
	}

	fn apply_gravity(&mut self) {
		let k = self.alpha * self.params.gravity;
		if k == 0.0 {
			return;
		}
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for body in &mut self.bodies {
			body.x += (cx - body.x) * k;
			body.y += (cy - body.y) * k;
		}
	}

	fn apply_charge(&mut self) {
		if self.params.charge == 0.0 {
			return;
		}
		let n = self.bodies.len();
		for i in 0..n {
			if self.bodies[i].pinned {
				continue;
			}
			let (xi, yi) = (self.bodies[i].x, self.bodies[i].y);
			let (mut fx, mut fy) = (0.0, 0.0);
			for j in 0..n {
				if j == i {
					continue;
				}
				let dx = self.bodies[j].x - xi;
				let dy = self.bodies[j].y - yi;
				let dist_sq = dx * dx + dy * dy;
				if dist_sq == 0.0 {
					continue;
				}
				let k = self.alpha * self.params.charge / dist_sq;
				fx -= dx * k;
				fy -= dy * k;
			}
			// Charge acts on the previous position, i.e. on velocity.
			self.bodies[i].px += fx;
			self.bodies[i].py += fy;
		}
	}

	fn integrate(&mut self) {
		let friction = self.params.friction;
		for body in &mut self.bodies {
			if body.pinned {
				body.x = body.px;
				body.y = body.py;
			} else {
				let (ox, oy) = (body.px, body.py);
				body.px = body.x;
				body.py = body.y;
				body.x += (body.x - ox) * friction;
				body.y += (body.y - oy) * friction;
			}
		}
	}
}

impl LayoutEngine for SpringLayout {
	fn load(&mut self, mut bodies: Vec<Body>, springs: Vec<Spring>) {
		for body in &mut bodies {
			body.degree = 0;
		}
		for spring in &springs {
			bodies[spring.source].degree += 1;
			bodies[spring.target].degree += 1;
		}
		self.bodies = bodies;
		self.springs = springs;
	}

	fn set_size(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	fn start(&mut self) {
		self.alpha = self.params.start_alpha;
		self.running = true;
	}

	fn resume(&mut self) {
		self.start();
	}

	fn running(&self) -> bool {
		self.running
	}

	fn tick(&mut self) -> bool {
		if !self.running {
			return false;
		}
		self.alpha *= self.params.cooling;
		if self.alpha < self.params.min_alpha {
			self.alpha = 0.0;
			self.running = false;
			return false;
		}

		self.relax_springs();
		self.apply_gravity();
		self.apply_charge();
		self.integrate();
		true
	}

	fn bodies(&self) -> &[Body] {
		&self.bodies
	}

	fn bodies_mut(&mut self) -> &mut [Body] {
		&mut self.bodies
	}

	fn set_pinned(&mut self, index: usize, pinned: bool) {
		let body = &mut self.bodies[index];
		body.pinned = pinned;
		if pinned {
			body.px = body.x;
			body.py = body.y;
		}
	}

	fn move_body(&mut self, index: usize, x: f64, y: f64) {
		let body = &mut self.bodies[index];
		body.x = x;
		body.y = y;
		body.px = x;
		body.py = y;
	}
}
