use glam::IVec3;

/// Bias added to each axis before interleaving so negative cell
/// coordinates encode to valid keys.
const BIAS: i32 = 1 << 20;

/// Largest coordinate magnitude the encoding supports. Each biased axis
/// must fit in 21 bits, so the signed domain is `-2^20 ..= 2^20 - 1`.
pub const MAX_COORD: i32 = BIAS - 1;

/// Smallest coordinate the encoding supports.
pub const MIN_COORD: i32 = -BIAS;

/// Morton-encode a cell coordinate into a single 63-bit key.
///
/// Bits of the three axes are interleaved (`...z1y1x1z0y0x0`) so cells
/// that are close in space tend to land close in key space, which keeps
/// bucket iteration cache-friendly. Coordinates outside
/// `MIN_COORD..=MAX_COORD` are a programming error, not a runtime
/// condition.
#[inline]
pub fn encode(coord: IVec3) -> u64 {
    debug_assert!(
        coord.cmpge(IVec3::splat(MIN_COORD)).all() && coord.cmple(IVec3::splat(MAX_COORD)).all(),
        "cell coordinate {coord} outside the encodable range"
    );
    let x = (coord.x + BIAS) as u64;
    let y = (coord.y + BIAS) as u64;
    let z = (coord.z + BIAS) as u64;
    spread(x) | (spread(y) << 1) | (spread(z) << 2)
}

/// Invert `encode`: recover the cell coordinate from a key.
#[inline]
pub fn decode(key: u64) -> IVec3 {
    IVec3::new(
        compact(key) as i32 - BIAS,
        compact(key >> 1) as i32 - BIAS,
        compact(key >> 2) as i32 - BIAS,
    )
}

/// Spread the low 21 bits of `v` so each lands 3 positions apart.
#[inline]
fn spread(v: u64) -> u64 {
    let mut x = v & 0x1f_ffff;
    x = (x | (x << 32)) & 0x1f_0000_0000_ffff;
    x = (x | (x << 16)) & 0x1f_0000_ff00_00ff;
    x = (x | (x << 8)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x << 4)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x << 2)) & 0x1249_2492_4924_9249;
    x
}

/// Inverse of `spread`: gather every third bit back into the low 21 bits.
#[inline]
fn compact(v: u64) -> u64 {
    let mut x = v & 0x1249_2492_4924_9249;
    x = (x | (x >> 2)) & 0x10c3_0c30_c30c_30c3;
    x = (x | (x >> 4)) & 0x100f_00f0_0f00_f00f;
    x = (x | (x >> 8)) & 0x1f_0000_ff00_00ff;
    x = (x | (x >> 16)) & 0x1f_0000_0000_ffff;
    x = (x | (x >> 32)) & 0x1f_ffff;
    x
}
