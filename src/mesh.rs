use crate::area::AreaMethod;
use crate::errors::ParseError;
use crate::utils;

/// A triangulated Hirshfeld surface with the d_i and d_e distances stored
/// at each vertex.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SurfaceMesh {
    /// The cartesian position of every vertex.
    pub vertices: Vec<[f64; 3]>,
    /// The vertex indices of every triangle.
    pub indices: Vec<[usize; 3]>,
    /// Distance from each vertex to the nearest nucleus inside the surface.
    pub d_i: Vec<f64>,
    /// Distance from each vertex to the nearest nucleus outside the surface.
    pub d_e: Vec<f64>,
}

impl SurfaceMesh {
    /// Builds a mesh and checks that the per-vertex arrays and indices agree
    /// with the vertex list.
    pub fn new(vertices: Vec<[f64; 3]>,
               indices: Vec<[usize; 3]>,
               d_i: Vec<f64>,
               d_e: Vec<f64>)
               -> Result<Self, ParseError> {
        let mesh = Self { vertices,
                          indices,
                          d_i,
                          d_e };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Checks every invariant that the reader cannot check line by line.
    pub fn validate(&self) -> Result<(), ParseError> {
        let n = self.vertices.len();
        if self.d_i.len() != n {
            return Err(ParseError::LengthMismatch(String::from("d_i"),
                                                  self.d_i.len(),
                                                  n));
        }
        if self.d_e.len() != n {
            return Err(ParseError::LengthMismatch(String::from("d_e"),
                                                  self.d_e.len(),
                                                  n));
        }
        for (t, triangle) in self.indices.iter().enumerate() {
            if let Some(i) = triangle.iter().find(|i| **i >= n) {
                return Err(ParseError::IndexOutOfRange(t, *i, n));
            }
        }
        Ok(())
    }

    /// Iterates over the triangles of the mesh.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.indices.iter().map(move |[a, b, c]| {
                               Triangle { points: [self.vertices[*a],
                                                   self.vertices[*b],
                                                   self.vertices[*c]],
                                          d_i: utils::mean3([self.d_i[*a],
                                                             self.d_i[*b],
                                                             self.d_i[*c]]),
                                          d_e: utils::mean3([self.d_e[*a],
                                                             self.d_e[*b],
                                                             self.d_e[*c]]) }
                           })
    }
}

/// A single surface triangle, built on demand and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Triangle {
    /// The three corners.
    pub points: [[f64; 3]; 3],
    /// Mean d_i of the corners.
    pub d_i: f64,
    /// Mean d_e of the corners.
    pub d_e: f64,
}

impl Triangle {
    /// Lengths of the sides opposite each corner.
    pub fn sides(&self) -> [f64; 3] {
        let [a, b, c] = self.points;
        [utils::distance(b, c), utils::distance(a, c), utils::distance(a, b)]
    }

    /// The area of the triangle, None if degenerate under the method.
    pub fn area(&self, method: AreaMethod) -> Option<f64> {
        let [a, b, c] = self.points;
        method.area(a, b, c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> SurfaceMesh {
        SurfaceMesh::new(vec![[0., 0., 0.], [1., 0., 0.], [1., 1., 0.], [0., 1., 0.]],
                         vec![[0, 1, 2], [0, 2, 3]],
                         vec![1.0, 1.0, 1.3, 1.3],
                         vec![2.0, 2.3, 2.0, 2.3]).unwrap()
    }

    #[test]
    fn mesh_triangles() {
        let mesh = square();
        let triangles = mesh.triangles().collect::<Vec<Triangle>>();
        assert_eq!(triangles.len(), 2);
        assert_eq!(triangles[0].points[1], [1., 0., 0.]);
        assert!((triangles[0].d_i - 1.1).abs() < 1E-12);
        assert!((triangles[1].d_e - 2.1).abs() < 1E-12);
    }

    #[test]
    fn mesh_index_out_of_range() {
        let err = SurfaceMesh::new(vec![[0.; 3]; 3],
                                   vec![[0, 1, 3]],
                                   vec![1.0; 3],
                                   vec![1.0; 3]).unwrap_err();
        assert!(matches!(err, ParseError::IndexOutOfRange(0, 3, 3)))
    }

    #[test]
    fn mesh_length_mismatch() {
        let err = SurfaceMesh::new(vec![[0.; 3]; 3],
                                   vec![[0, 1, 2]],
                                   vec![1.0; 3],
                                   vec![1.0; 2]).unwrap_err();
        assert!(matches!(err, ParseError::LengthMismatch(_, 2, 3)))
    }

    #[test]
    fn triangle_sides() {
        let t = Triangle { points: [[0., 0., 0.], [3., 0., 0.], [0., 4., 0.]],
                           d_i: 1.0,
                           d_e: 1.0 };
        assert_eq!(t.sides(), [5., 4., 3.])
    }
}
