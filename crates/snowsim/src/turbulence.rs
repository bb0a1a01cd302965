//! Precomputed wrapped turbulence grid.
//!
//! A fixed W x H x D toroidal grid of bias vectors, generated once from the
//! seeded master RNG and shared read-only by all integration shards. The
//! field is not animated.

use glam::Vec3;
use rand::Rng;

/// Immutable 3D grid of turbulence vectors with toroidal sampling.
pub struct TurbulenceField {
    width: usize,
    height: usize,
    depth: usize,
    /// width * height, precomputed for z-major indexing.
    stride: usize,
    vectors: Vec<Vec3>,
}

impl TurbulenceField {
    /// Generate the field. Every vector points downward (y < 0) so flakes
    /// never clump around upward-biased cells.
    pub fn generate(dims: (usize, usize, usize), rng: &mut impl Rng) -> Self {
        let (width, height, depth) = dims;
        debug_assert!(width > 0 && height > 0 && depth > 0);

        let mut vectors = Vec::with_capacity(width * height * depth);
        for _ in 0..depth {
            for _ in 0..height {
                for _ in 0..width {
                    vectors.push(Vec3::new(
                        rng.gen_range(-1.0..1.0),
                        rng.gen_range(-1.0..0.0),
                        rng.gen_range(-1.0..1.0),
                    ));
                }
            }
        }

        Self {
            width,
            height,
            depth,
            stride: width * height,
            vectors,
        }
    }

    /// Grid dimensions (width, height, depth).
    pub fn dims(&self) -> (usize, usize, usize) {
        (self.width, self.height, self.depth)
    }

    /// Stored vector at a lattice cell.
    #[inline]
    pub fn at(&self, i: usize, j: usize, k: usize) -> Vec3 {
        self.vectors[i + j * self.width + k * self.stride]
    }

    /// Trilinear sample at a world position.
    ///
    /// Each axis coordinate is scaled by `(dim - 1) / dim`, folded through
    /// `abs()`, and wrapped modulo the grid dimension; the fractional part is
    /// the interpolation weight. The `abs()` fold makes the field symmetric
    /// around each axis's zero plane. Defined for any finite input.
    pub fn sample(&self, pos: Vec3) -> Vec3 {
        let w = self.width as f32;
        let h = self.height as f32;
        let d = self.depth as f32;
        let i = (pos.x * (w - 1.0) / w).abs();
        let j = (pos.y * (h - 1.0) / h).abs();
        let k = (pos.z * (d - 1.0) / d).abs();

        let i0 = (i as usize) % self.width;
        let j0 = (j as usize) % self.height;
        let k0 = (k as usize) % self.depth;
        let i1 = (i0 + 1) % self.width;
        let j1 = (j0 + 1) % self.height;
        let k1 = (k0 + 1) % self.depth;
        let dx = i.fract();
        let dy = j.fract();
        let dz = k.fract();

        let t000 = self.at(i0, j0, k0);
        let t100 = self.at(i1, j0, k0);
        let t010 = self.at(i0, j1, k0);
        let t110 = self.at(i1, j1, k0);
        let t001 = self.at(i0, j0, k1);
        let t101 = self.at(i1, j0, k1);
        let t011 = self.at(i0, j1, k1);
        let t111 = self.at(i1, j1, k1);

        let x00 = t000.lerp(t100, dx);
        let x10 = t010.lerp(t110, dx);
        let x01 = t001.lerp(t101, dx);
        let x11 = t011.lerp(t111, dx);

        let y0 = x00.lerp(x10, dy);
        let y1 = x01.lerp(x11, dy);

        y0.lerp(y1, dz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn field() -> TurbulenceField {
        let mut rng = StdRng::seed_from_u64(533723);
        TurbulenceField::generate((16, 16, 16), &mut rng)
    }

    #[test]
    fn sample_at_origin_is_stored_vector() {
        let field = field();
        assert_eq!(field.sample(Vec3::ZERO), field.at(0, 0, 0));
    }

    #[test]
    fn sample_at_scaled_corner_is_stored_vector() {
        // 16.0 * 15 / 16 == 15.0 exactly, so all weights are zero.
        let field = field();
        let pos = Vec3::splat(16.0);
        assert_eq!(field.sample(pos), field.at(15, 15, 15));
    }

    #[test]
    fn sample_wraps_past_one_period() {
        // 32.0 * 15 / 16 == 30.0 exactly; 30 % 16 == 14.
        let field = field();
        assert_eq!(field.sample(Vec3::new(32.0, 0.0, 0.0)), field.at(14, 0, 0));
        assert_eq!(
            field.sample(Vec3::new(0.0, 16.0, 32.0)),
            field.at(0, 15, 14)
        );
    }

    #[test]
    fn vectors_are_biased_downward() {
        let field = field();
        let (w, h, d) = field.dims();
        for k in 0..d {
            for j in 0..h {
                for i in 0..w {
                    let t = field.at(i, j, k);
                    assert!(t.y < 0.0, "upward bias at ({i}, {j}, {k}): {t:?}");
                    assert!(t.x.abs() <= 1.0 && t.z.abs() <= 1.0);
                }
            }
        }
    }

    #[test]
    fn generation_is_deterministic() {
        let a = field();
        let b = field();
        assert_eq!(a.at(3, 7, 11), b.at(3, 7, 11));
        assert_eq!(
            a.sample(Vec3::new(1.2, -4.5, 9.9)),
            b.sample(Vec3::new(1.2, -4.5, 9.9))
        );
    }

    #[test]
    fn sample_is_finite_far_from_origin() {
        let field = field();
        let v = field.sample(Vec3::new(1.0e6, -3.0e5, 7.7e4));
        assert!(v.is_finite());
    }

    #[test]
    fn sample_mirrors_around_zero_planes() {
        let field = field();
        let p = Vec3::new(5.3, -2.1, 8.8);
        let mirrored = Vec3::new(-5.3, 2.1, -8.8);
        assert_eq!(field.sample(p), field.sample(mirrored));
    }
}
