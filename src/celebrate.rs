//! Level-complete celebration: a short burst of falling sparks.
//!
//! The simulation is pure (time in milliseconds is passed in) so it can be
//! tested natively; `draw` is the only canvas-facing part.

use web_sys::CanvasRenderingContext2d;

pub const CELEBRATION_MS: f64 = 3_000.0;
pub const SPARK_COUNT: usize = 150;
const GRAVITY_PX_PER_S2: f64 = 420.0;

/// Linear congruential generator; good enough for visual jitter.
#[derive(Clone, Copy, Debug)]
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed ^ 0x9E37_79B9_7F4A_7C15)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as u32
    }

    /// Uniform in `[lo, hi)`.
    pub fn range(&mut self, lo: f64, hi: f64) -> f64 {
        let unit = self.next_u32() as f64 / (u32::MAX as f64 + 1.0);
        lo + unit * (hi - lo)
    }
}

#[derive(Clone, Copy, Debug)]
struct Spark {
    x: f64,
    y: f64,
    vx: f64,
    vy: f64,
    hue: f64,
    size: f64,
}

pub struct Celebration {
    started_ms: f64,
    last_ms: f64,
    width: f64,
    height: f64,
    sparks: Vec<Spark>,
}

impl Celebration {
    pub fn new(now_ms: f64, width: f64, height: f64, seed: u64) -> Self {
        let mut rng = Lcg::new(seed);
        let sparks = (0..SPARK_COUNT)
            .map(|_| Spark {
                x: rng.range(0.0, width.max(1.0)),
                y: rng.range(-height * 0.5, 0.0),
                vx: rng.range(-80.0, 80.0),
                vy: rng.range(40.0, 220.0),
                hue: rng.range(0.0, 360.0),
                size: rng.range(4.0, 9.0),
            })
            .collect();
        Self {
            started_ms: now_ms,
            last_ms: now_ms,
            width,
            height,
            sparks,
        }
    }

    pub fn is_finished(&self, now_ms: f64) -> bool {
        now_ms - self.started_ms >= CELEBRATION_MS
    }

    /// Advance the simulation to `now_ms`; sparks that fall off-screen are dropped.
    pub fn tick(&mut self, now_ms: f64) {
        let dt = ((now_ms - self.last_ms) / 1000.0).clamp(0.0, 0.1);
        self.last_ms = now_ms;
        for s in &mut self.sparks {
            s.vy += GRAVITY_PX_PER_S2 * dt;
            s.x += s.vx * dt;
            s.y += s.vy * dt;
        }
        let bottom = self.height;
        self.sparks.retain(|s| s.y <= bottom + s.size);
    }

    pub fn live_sparks(&self) -> usize {
        self.sparks.len()
    }

    pub fn draw(&self, ctx: &CanvasRenderingContext2d, now_ms: f64) {
        ctx.clear_rect(0.0, 0.0, self.width, self.height);
        // Fade out over the last 20% of the run.
        let t = ((now_ms - self.started_ms) / CELEBRATION_MS).clamp(0.0, 1.0);
        let alpha = if t > 0.8 { (1.0 - t) / 0.2 } else { 1.0 };
        ctx.set_global_alpha(alpha);
        for s in &self.sparks {
            ctx.set_fill_style_str(&format!("hsl({:.0},85%,60%)", s.hue));
            ctx.fill_rect(s.x, s.y, s.size, s.size * 0.6);
        }
        ctx.set_global_alpha(1.0);
    }
}
