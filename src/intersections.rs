use crate::{Ray, Triangle, Vec3};

/// Objects capable of being intersected by a ray
pub trait RayIntersect {
    /// Parametric distance along the ray, or [`NO_HIT`]
    fn ray_intersect(&self, ray: &Ray) -> f32;
}

/// Returned by the intersector when the ray misses
pub const NO_HIT: f32 = f32::NEG_INFINITY;

/// Determinants below this reject the triangle. Not symmetric around zero, so back faces never hit
pub const DET_EPSILON: f32 = 1e-6;

/// Intersection found by [`intersect_barycentric`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Parametric distance, negative when the triangle is behind the origin
    pub t: f32,
    pub u: f32,
    pub v: f32,
}

impl Hit {
    /// Point on the triangle, `(1 - u - v) * v0 + u * v1 + v * v2`
    #[inline]
    pub fn point(&self, v0: Vec3, v1: Vec3, v2: Vec3) -> Vec3 {
        v0 * (1.0 - self.u - self.v) + v1 * self.u + v2 * self.v
    }
}

/// Single-sided Möller–Trumbore test returning the barycentric coordinates along with `t`
#[inline]
#[allow(clippy::manual_range_contains)]
pub fn intersect_barycentric(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<Hit> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let pvec = ray.direction.cross(edge2);
    let det = edge1.dot(pvec);
    // back facing or parallel. NaN is not rejected anywhere and comes out as a NaN `t`
    if det < DET_EPSILON {
        return None;
    }
    let inv_det = 1.0 / det;
    let tvec = ray.origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if u < 0.0 || u > 1.0 {
        return None;
    }
    let qvec = tvec.cross(edge1);
    let v = ray.direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = edge2.dot(qvec) * inv_det;
    Some(Hit { t, u, v })
}

/// Intersect a ray with the triangle `v0, v1, v2`. Hits behind the origin come back as negative `t`
#[inline]
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> f32 {
    match intersect_barycentric(ray, v0, v1, v2) {
        Some(hit) => hit.t,
        None => NO_HIT,
    }
}

impl RayIntersect for Triangle {
    #[inline]
    fn ray_intersect(&self, ray: &Ray) -> f32 {
        ray_triangle_intersect(ray, self.vertex0, self.vertex1, self.vertex2)
    }
}

#[cfg(test)]
mod tests {

    use rand::{distributions::Distribution, rngs::StdRng, Rng, SeedableRng};

    use approx::*;

    use crate::*;

    /// Facing +z, centroid at (0, -1/3, 5)
    fn facing_up() -> Triangle {
        Triangle::new(
            Vec3::new(-1.0, -1.0, 5.0),
            Vec3::new(1.0, -1.0, 5.0),
            Vec3::new(0.0, 1.0, 5.0),
        )
    }

    fn random_triangle(rng: &mut impl Rng) -> Triangle {
        let offset = Vec3::new(
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
            rng.gen_range(-5.0..5.0),
        );
        Triangle::new(
            UnitSphere.sample(rng) + offset,
            UnitSphere.sample(rng) + offset,
            UnitSphere.sample(rng) + offset,
        )
    }

    #[test]
    fn ray_triangle_intersect() {
        let tri = facing_up();
        let ray = Ray::new(tri.centroid() + Vec3::Z * 5.0, -Vec3::Z);

        let t = tri.ray_intersect(&ray);

        assert_abs_diff_eq!(t, 5.0, epsilon = 1e-5);
        assert_relative_eq!(ray.at(t), tri.centroid(), epsilon = 1e-5);
    }

    #[test]
    fn ray_random_triangles_intersect_at_centroid() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut tested = 0;
        while tested < 200 {
            let tri = random_triangle(&mut rng);
            let normal = tri.normal();
            if normal.length() < 0.1 {
                continue;
            }
            let n = normal.normalize();
            let distance = rng.gen_range(0.5..10.0);
            let ray = Ray::new(tri.centroid() + n * distance, -n);

            let hit = intersect_barycentric(&ray, tri.vertex0, tri.vertex1, tri.vertex2)
                .expect("front facing triangle hit through its centroid");

            assert!(hit.t.is_finite() && hit.t >= 0.0);
            assert!(hit.u >= 0.0 && hit.v >= 0.0 && hit.u + hit.v <= 1.0);
            assert_abs_diff_eq!(hit.t, distance, epsilon = 1e-3);
            assert_abs_diff_eq!(hit.u, 1.0 / 3.0, epsilon = 1e-3);
            assert_abs_diff_eq!(hit.v, 1.0 / 3.0, epsilon = 1e-3);
            assert_relative_eq!(
                hit.point(tri.vertex0, tri.vertex1, tri.vertex2),
                tri.centroid(),
                epsilon = 1e-3
            );
            tested += 1;
        }
    }

    #[test]
    fn ray_triangle_no_intersect() {
        let tri = facing_up();
        // front facing plane, but well outside the triangle
        let ray = Ray::new(Vec3::new(10.0, 10.0, 10.0), -Vec3::Z);

        assert_eq!(tri.ray_intersect(&ray), NO_HIT);
    }

    #[test]
    fn ray_pointing_away_no_intersect() {
        let tri = facing_up();
        let ray = Ray::new(tri.centroid() + Vec3::Z * 5.0, Vec3::Z);

        assert_eq!(tri.ray_intersect(&ray), NO_HIT);
    }

    #[test]
    fn back_facing_triangle_no_intersect() {
        let tri = facing_up().flipped();
        // straight through the centroid, the overlap is exact
        let ray = Ray::new(tri.centroid() + Vec3::Z * 5.0, -Vec3::Z);

        assert_eq!(tri.ray_intersect(&ray), NO_HIT);
        assert_eq!(facing_up().ray_intersect(&ray), 5.0);
    }

    #[test]
    fn parallel_ray_no_intersect() {
        let tri = facing_up();
        let ray = Ray::new(Vec3::new(-5.0, -1.0 / 3.0, 5.0), Vec3::X);

        assert_eq!(tri.ray_intersect(&ray), NO_HIT);
    }

    #[test]
    fn triangle_behind_origin_gives_negative_t() {
        let tri = facing_up();
        // origin below the triangle, heading further down
        let ray = Ray::new(tri.centroid() - Vec3::Z * 2.0, -Vec3::Z);

        let t = tri.ray_intersect(&ray);

        assert_ne!(t, NO_HIT);
        assert_abs_diff_eq!(t, -2.0, epsilon = 1e-5);
    }

    #[test]
    fn degenerate_inputs_no_intersect() {
        let tri = facing_up();
        let collapsed = Triangle::new(tri.vertex0, tri.vertex0, tri.vertex0);
        let ray = Ray::new(tri.centroid() + Vec3::Z * 5.0, -Vec3::Z);
        assert_eq!(collapsed.ray_intersect(&ray), NO_HIT);
        assert_eq!(Triangle::ZERO.ray_intersect(&ray), NO_HIT);
        assert_eq!(Triangle::default(), Triangle::ZERO);
    }

    #[test]
    fn non_finite_ray_propagates_nan() {
        let tri = facing_up();
        let nan_dir = Ray::towards(Vec3::ZERO, Vec3::ZERO);

        let t = tri.ray_intersect(&nan_dir);
        assert!(t.is_nan());
        assert_ne!(t, NO_HIT);

        let hit = intersect_barycentric(&nan_dir, tri.vertex0, tri.vertex1, tri.vertex2)
            .expect("NaN passes every rejection test");
        assert!(hit.u.is_nan() && hit.v.is_nan() && hit.t.is_nan());
    }
}
