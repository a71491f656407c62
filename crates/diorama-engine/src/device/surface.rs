use winit::dpi::PhysicalSize;

pub(crate) fn choose_surface_format(
    caps: &wgpu::SurfaceCapabilities,
    prefer_srgb: bool,
) -> Option<wgpu::TextureFormat> {
    let first = caps.formats.first().copied()?;

    if prefer_srgb {
        let preferred = [
            wgpu::TextureFormat::Bgra8UnormSrgb,
            wgpu::TextureFormat::Rgba8UnormSrgb,
        ];
        if let Some(f) = preferred.into_iter().find(|f| caps.formats.contains(f)) {
            return Some(f);
        }
    }

    Some(first)
}

pub(crate) fn choose_alpha_mode(
    caps: &wgpu::SurfaceCapabilities,
    requested: Option<wgpu::CompositeAlphaMode>,
) -> wgpu::CompositeAlphaMode {
    requested
        .filter(|m| caps.alpha_modes.contains(m))
        .or_else(|| caps.alpha_modes.first().copied())
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

/// Updates the configuration for `new_size`.
///
/// Returns false for a zero-area size: wgpu cannot configure a 0x0 surface,
/// so configuration is deferred until the next non-zero resize.
pub(crate) fn resize_config(config: &mut wgpu::SurfaceConfiguration, new_size: PhysicalSize<u32>) -> bool {
    if new_size.width == 0 || new_size.height == 0 {
        return false;
    }
    config.width = new_size.width;
    config.height = new_size.height;
    true
}
