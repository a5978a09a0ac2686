//! Square matrices.
//!
//! Matrices use the row-vector convention: a vector is transformed as
//! `v' = v * M`, elements are stored row-major, and the product `a * b`
//! applies `a` first. A translation therefore sits in the last row.
//!
//! A [`Matrix`] is an immutable, cheaply clonable handle. Behind the handle
//! it is one of several [`Variant`]s (dense, identity, scale, axis rotation,
//! translation) that agree on the elements they produce but compute
//! determinants, inverses, transposes and products with closed-form
//! shortcuts where the structure allows it. Elements, determinant, inverse
//! and transpose are computed on first use and cached, and a derived
//! inverse or transpose remembers its source so that deriving it back
//! returns the source instead of recomputing it.

mod mat2;
mod mat3;
mod mat4;

pub use mat2::{Mat2, Mat2Variant};
pub use mat3::{Mat3, Mat3Variant};
pub use mat4::{Mat4, Mat4Variant};

use crate::error::{Result, ensure_element_count, ensure_invertible};
use std::{
    fmt,
    sync::{Arc, OnceLock, Weak},
};

/// Coordinate axis of an axis-aligned rotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Result of a closed-form derivation (inverse or transpose) of a variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Derived<V> {
    /// The derived matrix is the source matrix itself.
    Same,
    /// The derived matrix has the given representation.
    New(V),
}

mod private {
    pub trait Sealed {}
}

/// Internal representation of a matrix of a given order.
///
/// Every variant must produce the same elements as a dense matrix would.
/// The `closed_form_*` methods return [`None`] when the variant has no
/// shortcut, in which case the generic element-based formula is used.
pub trait Variant: private::Sealed + Clone + fmt::Debug + Send + Sync + 'static {
    /// Number of rows and columns.
    const ORDER: usize;

    /// Row-major element storage.
    type Elements: Copy
        + Default
        + fmt::Debug
        + PartialEq
        + AsRef<[f32]>
        + AsMut<[f32]>
        + Send
        + Sync
        + 'static;

    /// Returns the process-wide identity matrix.
    fn identity_matrix() -> Matrix<Self>;

    /// Wraps the given elements in the dense variant.
    fn dense(elements: Self::Elements) -> Self;

    fn is_identity(&self) -> bool;

    fn elements(&self) -> Self::Elements;

    fn closed_form_determinant(&self) -> Option<f32>;

    fn cofactor_determinant(elements: &Self::Elements) -> f32;

    /// Only called when the determinant has been verified to be non-zero.
    fn closed_form_inverse(&self) -> Option<Derived<Self>>;

    fn cofactor_inverse(elements: &Self::Elements, determinant: f32) -> Self::Elements;

    fn closed_form_transpose(&self) -> Option<Derived<Self>>;

    /// Returns the structured product of two non-identity variants, if the
    /// pair has one.
    fn closed_form_product(lhs: &Self, rhs: &Self) -> Option<Self>;
}

/// An immutable square matrix. Cloning is cheap and shares the cached
/// derived values.
pub struct Matrix<V: Variant> {
    node: Arc<Node<V>>,
}

struct Node<V: Variant> {
    variant: V,
    origin: Origin<V>,
    elements: OnceLock<V::Elements>,
    determinant: OnceLock<f32>,
    inversed: OnceLock<Matrix<V>>,
    transposed: OnceLock<Matrix<V>>,
}

/// Back-reference from a derived matrix to its source. The source owns the
/// derived matrix through its cache, so the back-reference must be weak.
enum Origin<V: Variant> {
    Constructed,
    InverseOf(Weak<Node<V>>),
    TransposeOf(Weak<Node<V>>),
}

impl<V: Variant> Matrix<V> {
    /// Returns the identity matrix. All identity matrices of an order share
    /// the same storage.
    pub fn identity() -> Self {
        V::identity_matrix()
    }

    /// Creates a dense matrix from row-major elements.
    pub fn from_elements(elements: V::Elements) -> Self {
        Self::from_variant(V::dense(elements))
    }

    /// Creates a dense matrix from a row-major slice.
    ///
    /// # Errors
    /// Returns [`MathError::ElementCount`](crate::error::MathError) if the
    /// slice does not hold exactly `ORDER * ORDER` elements.
    pub fn try_from_slice(slice: &[f32]) -> Result<Self> {
        ensure_element_count(V::ORDER * V::ORDER, slice)?;
        let mut elements = V::Elements::default();
        elements.as_mut().copy_from_slice(slice);
        Ok(Self::from_elements(elements))
    }

    /// Creates a matrix with the given representation.
    pub fn from_variant(variant: V) -> Self {
        Self::with_origin(variant, Origin::Constructed)
    }

    fn with_origin(variant: V, origin: Origin<V>) -> Self {
        Self {
            node: Arc::new(Node {
                variant,
                origin,
                elements: OnceLock::new(),
                determinant: OnceLock::new(),
                inversed: OnceLock::new(),
                transposed: OnceLock::new(),
            }),
        }
    }

    /// The internal representation of the matrix.
    pub fn variant(&self) -> &V {
        &self.node.variant
    }

    pub fn is_identity(&self) -> bool {
        self.node.variant.is_identity()
    }

    /// Whether both handles share the same storage.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.node, &other.node)
    }

    /// The row-major elements of the matrix.
    pub fn elements(&self) -> &V::Elements {
        self.node
            .elements
            .get_or_init(|| self.node.variant.elements())
    }

    pub fn as_slice(&self) -> &[f32] {
        self.elements().as_ref()
    }

    pub fn to_array(&self) -> V::Elements {
        *self.elements()
    }

    /// The element at the given row and column.
    ///
    /// # Panics
    /// If `row` or `column` is not smaller than the order of the matrix.
    pub fn element(&self, row: usize, column: usize) -> f32 {
        assert!(row < V::ORDER && column < V::ORDER);
        self.as_slice()[row * V::ORDER + column]
    }

    pub fn determinant(&self) -> f32 {
        *self.node.determinant.get_or_init(|| {
            self.node
                .variant
                .closed_form_determinant()
                .unwrap_or_else(|| V::cofactor_determinant(self.elements()))
        })
    }

    /// Computes the inverse of the matrix.
    ///
    /// Inverting the returned matrix again gives back this matrix without
    /// recomputation, as long as this matrix is still alive.
    ///
    /// # Errors
    /// Returns [`MathError::SingularMatrix`](crate::error::MathError) if the
    /// determinant is zero (within
    /// [`DETERMINANT_EPSILON`](crate::error::DETERMINANT_EPSILON)) or not
    /// finite.
    pub fn inversed(&self) -> Result<Self> {
        if let Some(inverse) = self.node.inversed.get() {
            return Ok(inverse.clone());
        }
        if let Origin::InverseOf(source) = &self.node.origin {
            if let Some(node) = source.upgrade() {
                return Ok(Self { node });
            }
        }

        let determinant = self.determinant();
        ensure_invertible(V::ORDER, determinant)?;

        let derived = self.node.variant.closed_form_inverse().unwrap_or_else(|| {
            Derived::New(V::dense(V::cofactor_inverse(self.elements(), determinant)))
        });

        Ok(self.cache_derived(&self.node.inversed, derived, Origin::InverseOf))
    }

    /// Computes the transpose of the matrix.
    ///
    /// Transposing the returned matrix again gives back this matrix without
    /// recomputation, as long as this matrix is still alive.
    pub fn transposed(&self) -> Self {
        if let Some(transpose) = self.node.transposed.get() {
            return transpose.clone();
        }
        if let Origin::TransposeOf(source) = &self.node.origin {
            if let Some(node) = source.upgrade() {
                return Self { node };
            }
        }

        let derived = self
            .node
            .variant
            .closed_form_transpose()
            .unwrap_or_else(|| Derived::New(V::dense(transpose_elements::<V>(self.elements()))));

        self.cache_derived(&self.node.transposed, derived, Origin::TransposeOf)
    }

    /// Multiplies two matrices. With the row-vector convention the result
    /// applies `lhs` first and then `rhs`.
    ///
    /// Identity operands are absorbed and structured pairs (two scalings, two
    /// rotations about the same axis, two translations) stay structured.
    /// Everything else falls back to a dense product.
    pub fn mul(lhs: &Self, rhs: &Self) -> Self {
        if lhs.is_identity() {
            return rhs.clone();
        }
        if rhs.is_identity() {
            return lhs.clone();
        }
        match V::closed_form_product(&lhs.node.variant, &rhs.node.variant) {
            Some(variant) => Self::from_variant(variant),
            None => Self::from_elements(multiply_elements::<V>(lhs.elements(), rhs.elements())),
        }
    }

    /// Multiplies the given matrices from left to right. An empty sequence
    /// gives the identity matrix.
    pub fn mul_all<'a>(matrices: impl IntoIterator<Item = &'a Self>) -> Self {
        matrices
            .into_iter()
            .fold(Self::identity(), |product, matrix| Self::mul(&product, matrix))
    }

    fn cache_derived(
        &self,
        cache: &OnceLock<Self>,
        derived: Derived<V>,
        origin: fn(Weak<Node<V>>) -> Origin<V>,
    ) -> Self {
        match derived {
            // Never stored in our own cache, that would be a reference cycle.
            Derived::Same => self.clone(),
            Derived::New(variant) => {
                let matrix = Self::with_origin(variant, origin(Arc::downgrade(&self.node)));
                cache.get_or_init(|| matrix).clone()
            }
        }
    }
}

impl<V: Variant> Clone for Matrix<V> {
    fn clone(&self) -> Self {
        Self {
            node: Arc::clone(&self.node),
        }
    }
}

impl<V: Variant> Default for Matrix<V> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<V: Variant> PartialEq for Matrix<V> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.elements() == other.elements()
    }
}

impl<V: Variant> fmt::Debug for Matrix<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("variant", &self.node.variant)
            .field("elements", self.elements())
            .finish()
    }
}

/// Row-major product of two `V::ORDER`-square element arrays.
fn multiply_elements<V: Variant>(lhs: &V::Elements, rhs: &V::Elements) -> V::Elements {
    let n = V::ORDER;
    let (a, b) = (lhs.as_ref(), rhs.as_ref());
    let mut product = V::Elements::default();
    for (index, element) in product.as_mut().iter_mut().enumerate() {
        let (row, column) = (index / n, index % n);
        *element = (0..n).map(|k| a[row * n + k] * b[k * n + column]).sum();
    }
    product
}

fn transpose_elements<V: Variant>(elements: &V::Elements) -> V::Elements {
    let n = V::ORDER;
    let source = elements.as_ref();
    let mut transposed = V::Elements::default();
    for (index, element) in transposed.as_mut().iter_mut().enumerate() {
        *element = source[(index % n) * n + index / n];
    }
    transposed
}

/// Transforms a row vector by a row-major `N`x`N` matrix.
fn transform_row<const N: usize>(row: [f32; N], elements: &[f32]) -> [f32; N] {
    std::array::from_fn(|column| (0..N).map(|k| row[k] * elements[k * N + column]).sum())
}

/// Row-major 3x3 rotation about a coordinate axis.
fn axis_rotation_elements(axis: Axis, angle: f32) -> [f32; 9] {
    let (s, c) = angle.sin_cos();
    match axis {
        Axis::X => [1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c],
        Axis::Y => [c, 0.0, -s, 0.0, 1.0, 0.0, s, 0.0, c],
        Axis::Z => [c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0],
    }
}
