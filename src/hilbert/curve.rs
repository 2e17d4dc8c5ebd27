//! Hilbert curve traversal of d-dimensional power-of-two lattices.
//!
//! Index-to-coordinate conversion uses Skilling's transpose formulation
//! ("Programming the Hilbert curve", 2004): the curve index is de-interleaved into
//! one word per axis, Gray-decoded, and then the per-level rotations/reflections are
//! undone from the least significant level upwards. It works for any dimension, which
//! the classic 2-D `d2xy` quadrant recursion does not.
//!
//! Raster indices follow ndarray's row-major layout: the last axis varies fastest.
//!
//! Rectangular power-of-two lattices are tiled with hypercubes whose side is the
//! shortest side. Tiles are visited in boustrophedon order along the axis with the
//! most tiles, and each tile is walked with the cube curve, turned so that it exits
//! towards the next tile. The walk is `O(n·d)` whatever the aspect ratio.

use crate::config::HilbertPolicy;
use crate::error::{ComplexityError, Result};

/// Upper bound on the number of cells in one permutation.
pub const MAX_HYPERCUBE_CELLS: u64 = 1 << 36;

//==================================================================================
// 1. Core Transform
//==================================================================================

/// Converts a Hilbert index into per-axis coordinates on a `2^bits` hypercube.
///
/// `coords.len()` is the dimension. `bits * coords.len()` must not exceed 64.
pub fn index_to_coords(index: u64, bits: u32, coords: &mut [u64]) {
    let dims = coords.len();
    coords.iter_mut().for_each(|c| *c = 0);
    if bits == 0 || dims == 0 {
        return;
    }

    // De-interleave: the most significant group of `dims` bits holds the top bit of
    // every axis, axis 0 first.
    for level in 0..bits {
        let bit_pos = bits - 1 - level;
        for (axis, c) in coords.iter_mut().enumerate() {
            let shift = bit_pos as usize * dims + (dims - 1 - axis);
            *c |= ((index >> shift) & 1) << bit_pos;
        }
    }

    transpose_to_axes(coords, bits);
}

/// Skilling's `TransposetoAxes`.
fn transpose_to_axes(x: &mut [u64], bits: u32) {
    let n = x.len();
    let top = 1u64 << bits;

    // Gray decode by H ^ (H/2)
    let t = x[n - 1] >> 1;
    for i in (1..n).rev() {
        x[i] ^= x[i - 1];
    }
    x[0] ^= t;

    // Undo excess work
    let mut q = 2u64;
    while q != top {
        let p = q - 1;
        for i in (0..n).rev() {
            if x[i] & q != 0 {
                x[0] ^= p; // invert
            } else {
                let t = (x[0] ^ x[i]) & p; // exchange
                x[0] ^= t;
                x[i] ^= t;
            }
        }
        q <<= 1;
    }
}

//==================================================================================
// 2. Permutation Construction
//==================================================================================

/// Checks a shape against the policy and returns `(cell_count, tile_bits)`, where the
/// tile side `2^tile_bits` is the shortest side.
pub fn validate_shape(shape: &[usize], policy: HilbertPolicy) -> Result<(usize, u32)> {
    if shape.is_empty() {
        return Err(ComplexityError::InvalidShape(
            "shape must have at least one dimension".to_string(),
        ));
    }
    if let Some(&bad) = shape.iter().find(|&&s| s == 0 || !s.is_power_of_two()) {
        return Err(ComplexityError::InvalidShape(format!(
            "side length {} in {:?} is not a positive power of two",
            bad, shape
        )));
    }
    if policy == HilbertPolicy::Strict && shape.iter().any(|&s| s != shape[0]) {
        return Err(ComplexityError::InvalidShape(format!(
            "strict Hilbert traversal needs a hypercube, got {:?}",
            shape
        )));
    }

    let n = shape
        .iter()
        .try_fold(1usize, |acc, &s| acc.checked_mul(s))
        .ok_or_else(|| ComplexityError::InvalidShape(format!("{:?} overflows usize", shape)))?;

    if n as u64 > MAX_HYPERCUBE_CELLS {
        return Err(ComplexityError::InvalidShape(format!(
            "{:?} has more than {} cells",
            shape, MAX_HYPERCUBE_CELLS
        )));
    }
    let side = shape.iter().copied().min().unwrap_or(1);
    Ok((n, side.trailing_zeros()))
}

fn raster_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1usize; shape.len()];
    for axis in (0..shape.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * shape[axis + 1];
    }
    strides
}

/// The axis along which the cube curve's last cell is displaced from its first.
fn exit_axis(bits: u32, dims: usize) -> usize {
    let mut coords = vec![0u64; dims];
    let last = (1u64 << (bits as u64 * dims as u64)) - 1;
    index_to_coords(last, bits, &mut coords);
    coords.iter().position(|&c| c != 0).unwrap_or(0)
}

/// Raster offsets of one tile's walk, relative to the tile origin, leaving along
/// `travel` in the forward and in the backward direction.
fn tile_offsets(bits: u32, strides: &[usize], travel: usize) -> (Vec<usize>, Vec<usize>) {
    let dims = strides.len();
    let side = 1usize << bits;
    let cells = 1u64 << (bits as u64 * dims as u64);
    let exit = exit_axis(bits, dims);

    let mut forward = Vec::with_capacity(cells as usize);
    let mut backward = Vec::with_capacity(cells as usize);
    let mut coords = vec![0u64; dims];
    for index in 0..cells {
        index_to_coords(index, bits, &mut coords);
        coords.swap(exit, travel);
        let across: usize = coords
            .iter()
            .zip(strides)
            .enumerate()
            .filter(|&(axis, _)| axis != travel)
            .map(|(_, (&c, &stride))| c as usize * stride)
            .sum();
        let along = coords[travel] as usize;
        forward.push(across + along * strides[travel]);
        backward.push(across + (side - 1 - along) * strides[travel]);
    }
    (forward, backward)
}

/// Builds the Hilbert traversal order of `shape` as raster indices.
///
/// Entry `k` of the result is the row-major index of the `k`-th cell visited. The
/// result is always a bijection over `[0, n)`.
pub fn hilbert_permutation(shape: &[usize], policy: HilbertPolicy) -> Result<Vec<usize>> {
    let (n, bits) = validate_shape(shape, policy)?;
    let dims = shape.len();
    let side = 1usize << bits;
    let strides = raster_strides(shape);

    let grid: Vec<usize> = shape.iter().map(|&s| s / side).collect();
    let tiles: usize = grid.iter().product();
    let travel = if tiles == 1 {
        exit_axis(bits, dims)
    } else {
        (0..dims)
            .max_by_key(|&axis| (grid[axis], std::cmp::Reverse(axis)))
            .unwrap_or(0)
    };
    let (forward, backward) = tile_offsets(bits, &strides, travel);

    // Mixed-radix reflected counter over the tile grid, `travel` least significant.
    let order: Vec<usize> = (0..dims)
        .filter(|&axis| axis != travel)
        .chain(std::iter::once(travel))
        .collect();
    let mut digits = vec![0usize; dims];
    let mut permutation = Vec::with_capacity(n);

    for _ in 0..tiles {
        let mut origin = 0usize;
        let mut higher = 0usize;
        let mut backwards = false;
        for (pos, &axis) in order.iter().enumerate() {
            let reflected = higher % 2 == 1;
            let tile = if reflected {
                grid[axis] - 1 - digits[pos]
            } else {
                digits[pos]
            };
            origin += tile * side * strides[axis];
            higher += digits[pos];
            if axis == travel {
                backwards = reflected;
            }
        }

        let offsets = if backwards { &backward } else { &forward };
        permutation.extend(offsets.iter().map(|&o| origin + o));

        for pos in (0..dims).rev() {
            digits[pos] += 1;
            if digits[pos] < grid[order[pos]] {
                break;
            }
            digits[pos] = 0;
        }
    }

    if permutation.len() != n {
        return Err(ComplexityError::InternalError(format!(
            "Hilbert walk of {:?} visited {} of {} cells",
            shape,
            permutation.len(),
            n
        )));
    }
    Ok(permutation)
}
