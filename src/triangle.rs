use bytemuck::{Pod, Zeroable};
use rand::{distributions::Distribution, Rng};

use crate::{UnitSphere, Vec3};

#[derive(Debug, Default, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Triangle {
    pub vertex0: Vec3,
    pub vertex1: Vec3,
    pub vertex2: Vec3,
}

impl Triangle {
    /// Zeroed Triangle
    pub const ZERO: Self = Triangle {
        vertex0: Vec3::ZERO,
        vertex1: Vec3::ZERO,
        vertex2: Vec3::ZERO,
    };

    #[inline]
    pub fn new(vertex0: Vec3, vertex1: Vec3, vertex2: Vec3) -> Triangle {
        Triangle {
            vertex0,
            vertex1,
            vertex2,
        }
    }

    #[inline]
    pub fn centroid(&self) -> Vec3 {
        (self.vertex0 + self.vertex1 + self.vertex2) * (1.0 / 3.0)
    }

    /// Unnormalized normal following the winding order. Rays travelling against it hit the front face
    #[inline]
    pub fn normal(&self) -> Vec3 {
        (self.vertex1 - self.vertex0).cross(self.vertex2 - self.vertex0)
    }

    /// Same vertices, opposite winding
    #[inline]
    pub fn flipped(&self) -> Triangle {
        Triangle::new(self.vertex0, self.vertex2, self.vertex1)
    }
}

/// Triangles stored as one flat vertex buffer, three consecutive vertices per triangle.
/// Allocated once and never modified afterwards.
#[derive(Debug, Clone, Default)]
pub struct TriangleSoup {
    vertices: Vec<Vec3>,
}

impl TriangleSoup {
    /// `count` triangles with every vertex drawn from [`UnitSphere`]
    pub fn random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Self {
        let vertices = UnitSphere.sample_iter(rng).take(count * 3).collect();
        Self { vertices }
    }

    /// Returns `None` unless the buffer length is a multiple of three
    pub fn from_vertices(vertices: Vec<Vec3>) -> Option<Self> {
        (vertices.len() % 3 == 0).then_some(Self { vertices })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    #[inline]
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// View of the vertex buffer as triangles, without copying
    #[inline]
    pub fn triangles(&self) -> &[Triangle] {
        bytemuck::cast_slice(&self.vertices)
    }
}

impl FromIterator<Triangle> for TriangleSoup {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        let vertices = iter
            .into_iter()
            .flat_map(|tri| [tri.vertex0, tri.vertex1, tri.vertex2])
            .collect();
        Self { vertices }
    }
}
