/// Vulkan format → Amber format name conversion
///
/// Amber spells formats exactly like the Vulkan enumerants without the
/// `VK_FORMAT_` prefix. Block-compressed and multi-planar formats have no
/// Amber equivalent.

use amber_scoop::scoop::{Error, Result};
use ash::vk;

macro_rules! amber_format_table {
    ($format:expr, [$($name:ident),* $(,)?]) => {
        match $format {
            $(vk::Format::$name => Some(stringify!($name)),)*
            _ => None,
        }
    };
}

/// Look up the Amber name of a Vulkan format, if Amber has one
pub fn try_amber_format_name(format: vk::Format) -> Option<&'static str> {
    amber_format_table!(format, [
        // Packed 8/16-bit
        R4G4_UNORM_PACK8,
        R4G4B4A4_UNORM_PACK16,
        B4G4R4A4_UNORM_PACK16,
        R5G6B5_UNORM_PACK16,
        B5G6R5_UNORM_PACK16,
        R5G5B5A1_UNORM_PACK16,
        B5G5R5A1_UNORM_PACK16,
        A1R5G5B5_UNORM_PACK16,
        // 8-bit
        R8_UNORM, R8_SNORM, R8_USCALED, R8_SSCALED, R8_UINT, R8_SINT, R8_SRGB,
        R8G8_UNORM, R8G8_SNORM, R8G8_USCALED, R8G8_SSCALED, R8G8_UINT, R8G8_SINT, R8G8_SRGB,
        R8G8B8_UNORM, R8G8B8_SNORM, R8G8B8_USCALED, R8G8B8_SSCALED, R8G8B8_UINT, R8G8B8_SINT, R8G8B8_SRGB,
        B8G8R8_UNORM, B8G8R8_SNORM, B8G8R8_USCALED, B8G8R8_SSCALED, B8G8R8_UINT, B8G8R8_SINT, B8G8R8_SRGB,
        R8G8B8A8_UNORM, R8G8B8A8_SNORM, R8G8B8A8_USCALED, R8G8B8A8_SSCALED, R8G8B8A8_UINT, R8G8B8A8_SINT, R8G8B8A8_SRGB,
        B8G8R8A8_UNORM, B8G8R8A8_SNORM, B8G8R8A8_USCALED, B8G8R8A8_SSCALED, B8G8R8A8_UINT, B8G8R8A8_SINT, B8G8R8A8_SRGB,
        // Packed 32-bit
        A8B8G8R8_UNORM_PACK32, A8B8G8R8_SNORM_PACK32, A8B8G8R8_USCALED_PACK32, A8B8G8R8_SSCALED_PACK32,
        A8B8G8R8_UINT_PACK32, A8B8G8R8_SINT_PACK32, A8B8G8R8_SRGB_PACK32,
        A2R10G10B10_UNORM_PACK32, A2R10G10B10_SNORM_PACK32, A2R10G10B10_USCALED_PACK32,
        A2R10G10B10_SSCALED_PACK32, A2R10G10B10_UINT_PACK32, A2R10G10B10_SINT_PACK32,
        A2B10G10R10_UNORM_PACK32, A2B10G10R10_SNORM_PACK32, A2B10G10R10_USCALED_PACK32,
        A2B10G10R10_SSCALED_PACK32, A2B10G10R10_UINT_PACK32, A2B10G10R10_SINT_PACK32,
        B10G11R11_UFLOAT_PACK32, E5B9G9R9_UFLOAT_PACK32,
        // 16-bit
        R16_UNORM, R16_SNORM, R16_USCALED, R16_SSCALED, R16_UINT, R16_SINT, R16_SFLOAT,
        R16G16_UNORM, R16G16_SNORM, R16G16_USCALED, R16G16_SSCALED, R16G16_UINT, R16G16_SINT, R16G16_SFLOAT,
        R16G16B16_UNORM, R16G16B16_SNORM, R16G16B16_USCALED, R16G16B16_SSCALED, R16G16B16_UINT, R16G16B16_SINT, R16G16B16_SFLOAT,
        R16G16B16A16_UNORM, R16G16B16A16_SNORM, R16G16B16A16_USCALED, R16G16B16A16_SSCALED,
        R16G16B16A16_UINT, R16G16B16A16_SINT, R16G16B16A16_SFLOAT,
        // 32-bit
        R32_UINT, R32_SINT, R32_SFLOAT,
        R32G32_UINT, R32G32_SINT, R32G32_SFLOAT,
        R32G32B32_UINT, R32G32B32_SINT, R32G32B32_SFLOAT,
        R32G32B32A32_UINT, R32G32B32A32_SINT, R32G32B32A32_SFLOAT,
        // 64-bit
        R64_UINT, R64_SINT, R64_SFLOAT,
        R64G64_UINT, R64G64_SINT, R64G64_SFLOAT,
        R64G64B64_UINT, R64G64B64_SINT, R64G64B64_SFLOAT,
        R64G64B64A64_UINT, R64G64B64A64_SINT, R64G64B64A64_SFLOAT,
        // Depth / stencil
        D16_UNORM, X8_D24_UNORM_PACK32, D32_SFLOAT, S8_UINT,
        D16_UNORM_S8_UINT, D24_UNORM_S8_UINT, D32_SFLOAT_S8_UINT,
    ])
}

/// Amber name of a Vulkan format
///
/// # Errors
///
/// `Error::Unsupported` if Amber cannot express the format.
pub fn amber_format_name(format: vk::Format) -> Result<&'static str> {
    try_amber_format_name(format)
        .ok_or_else(|| Error::Unsupported(format!("Format {:?} has no Amber equivalent", format)))
}

#[cfg(test)]
#[path = "vulkan_format_tests.rs"]
mod tests;
