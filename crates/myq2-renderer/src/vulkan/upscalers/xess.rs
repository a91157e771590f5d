//! Intel XeSS (Xe Super Sampling) integration
//!
//! XeSS uses machine learning to produce high-quality upscaled images.
//! Unlike DLSS, XeSS works on any GPU (with best performance on Intel Arc).
//!
//! The XeSS SDK is open and can be freely distributed.
//! Download from: https://github.com/intel/xess

use ash::vk;
use super::{Upscaler, UpscalerBackend, UpscalerQuality};

/// XeSS quality mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum XeSSQualityMode {
    /// Ultra Performance - maximum FPS, lower quality
    UltraPerformance = 1,
    /// Performance - good balance for high framerates
    Performance = 2,
    /// Balanced - balanced quality and performance
    Balanced = 3,
    /// Quality - high quality with moderate upscaling
    Quality = 4,
    /// Ultra Quality - minimal upscaling, best quality
    UltraQuality = 5,
    /// Ultra Quality Plus - highest quality preset
    UltraQualityPlus = 6,
    /// Native AA - no upscaling, just anti-aliasing
    NativeAA = 7,
}

impl From<UpscalerQuality> for XeSSQualityMode {
    fn from(quality: UpscalerQuality) -> Self {
        match quality {
            UpscalerQuality::UltraPerformance => XeSSQualityMode::UltraPerformance,
            UpscalerQuality::Performance => XeSSQualityMode::Performance,
            UpscalerQuality::Balanced => XeSSQualityMode::Balanced,
            UpscalerQuality::Quality => XeSSQualityMode::Quality,
            UpscalerQuality::UltraQuality => XeSSQualityMode::UltraQuality,
            UpscalerQuality::NativeAA => XeSSQualityMode::NativeAA,
        }
    }
}

/// Halton sequence for jitter.
const JITTER_SAMPLES: usize = 64;

/// XeSS initialization flags.
#[derive(Debug, Clone, Copy)]
pub struct XeSSInitFlags {
    /// Use high-resolution motion vectors (full resolution instead of half).
    pub high_res_mv: bool,
    /// Motion vectors are in NDC space (otherwise screen space).
    pub motion_vectors_ndc: bool,
    /// Motion vectors are jittered (include jitter offset).
    pub motion_vectors_jittered: bool,
    /// Depth is inverted (1 = near, 0 = far).
    pub inverted_depth: bool,
    /// Use responsive pixel mask for better handling of thin objects.
    pub responsive_pixel_mask: bool,
    /// Enable auto exposure.
    pub auto_exposure: bool,
}

impl Default for XeSSInitFlags {
    fn default() -> Self {
        Self {
            high_res_mv: false,
            motion_vectors_ndc: false,
            motion_vectors_jittered: false,
            inverted_depth: false,
            responsive_pixel_mask: false,
            auto_exposure: true,
        }
    }
}

/// XeSS upscaler instance.
pub struct XeSSUpscaler {
    /// Whether XeSS is available.
    available: bool,
    /// Whether XeSS is initialized.
    initialized: bool,
    /// Current quality preset.
    quality: UpscalerQuality,
    /// Initialization flags.
    flags: XeSSInitFlags,
    /// Current jitter index.
    jitter_index: u32,
    /// Pre-computed Halton jitter sequence.
    jitter_sequence: [[f32; 2]; JITTER_SAMPLES],
    /// Render dimensions.
    render_width: u32,
    render_height: u32,
    /// Display dimensions.
    display_width: u32,
    display_height: u32,
    /// Whether running on Intel GPU (gets XMX acceleration).
    is_intel_gpu: bool,
    // XeSS SDK handles would go here:
    // xess_context: xess_context_handle_t,
}

impl XeSSUpscaler {
    /// Create a new XeSS upscaler.
    pub fn new(ctx: &super::super::context::VulkanContext) -> Option<Self> {
        // XeSS works on any Vulkan 1.1+ GPU, but we require 1.3
        // Best performance is on Intel Arc GPUs with XMX units

        let props = unsafe {
            ctx.instance.get_physical_device_properties(ctx.physical_device)
        };

        // Intel vendor ID is 0x8086
        let is_intel_gpu = props.vendor_id == 0x8086;

        // XeSS SDK availability check would go here
        // For now, assume available if we have Vulkan 1.3
        let available = true;

        // Generate Halton jitter sequence
        let jitter_sequence = Self::generate_halton_sequence();

        Some(Self {
            available,
            initialized: false,
            quality: UpscalerQuality::Quality,
            flags: XeSSInitFlags::default(),
            jitter_index: 0,
            jitter_sequence,
            render_width: 0,
            render_height: 0,
            display_width: 0,
            display_height: 0,
            is_intel_gpu,
        })
    }

    /// Generate Halton sequence for sub-pixel jitter.
    fn generate_halton_sequence() -> [[f32; 2]; JITTER_SAMPLES] {
        let mut sequence = [[0.0f32; 2]; JITTER_SAMPLES];
        for i in 0..JITTER_SAMPLES {
            sequence[i][0] = Self::halton(i as u32 + 1, 2) - 0.5;
            sequence[i][1] = Self::halton(i as u32 + 1, 3) - 0.5;
        }
        sequence
    }

    /// Compute Halton sequence element.
    fn halton(mut index: u32, base: u32) -> f32 {
        let mut f = 1.0f32;
        let mut r = 0.0f32;
        let base_f = base as f32;
        while index > 0 {
            f /= base_f;
            r += f * (index % base) as f32;
            index /= base;
        }
        r
    }

    /// Initialize XeSS with the SDK.
    pub fn initialize(&mut self) -> Result<(), String> {
        if self.initialized {
            return Ok(());
        }

        if !self.available {
            return Err("XeSS not available".to_string());
        }

        // In production, this would:
        // 1. Call xessD3D12CreateContext() or xessVulkanCreateContext()
        // 2. Call xessGetOptimalInputResolution() to get render size
        // 3. Call xessD3D12Init() or xessVulkanInit() with quality and flags
        //
        // XeSS SDK functions:
        // - xessVulkanCreateContext(device, &context)
        // - xessVulkanInit(context, &init_params)
        // - xessVulkanExecute(context, cmd, &exec_params)
        // - xessDestroyContext(context)

        self.initialized = true;
        Ok(())
    }

    /// Set initialization flags (before init).
    pub fn set_flags(&mut self, flags: XeSSInitFlags) {
        self.flags = flags;
    }

    /// Get optimal render resolution for the current quality and display size.
    pub fn optimal_render_size(&self, display_width: u32, display_height: u32) -> (u32, u32) {
        // XeSS provides xessGetOptimalInputResolution() to get exact values
        // For now, use our scale factors
        let scale = self.quality.render_scale();
        let render_width = ((display_width as f32) * scale) as u32;
        let render_height = ((display_height as f32) * scale) as u32;
        (render_width.max(1), render_height.max(1))
    }

    /// Check if running on Intel GPU (gets XMX acceleration).
    pub fn is_intel_accelerated(&self) -> bool {
        self.is_intel_gpu
    }
}

impl Upscaler for XeSSUpscaler {
    fn is_available(&self) -> bool {
        self.available
    }

    fn backend(&self) -> UpscalerBackend {
        UpscalerBackend::XeSS
    }

    fn quality(&self) -> UpscalerQuality {
        self.quality
    }

    fn set_quality(&mut self, quality: UpscalerQuality) {
        self.quality = quality;
        // In production: reinitialize XeSS with new quality mode
    }

    fn jitter_offset(&self) -> (f32, f32) {
        let idx = (self.jitter_index as usize) % JITTER_SAMPLES;
        let jitter = self.jitter_sequence[idx];
        (jitter[0], jitter[1])
    }

    fn next_frame(&mut self) {
        self.jitter_index = (self.jitter_index + 1) % (JITTER_SAMPLES as u32);
    }

    fn resize(&mut self, render_width: u32, render_height: u32, display_width: u32, display_height: u32) {
        self.render_width = render_width;
        self.render_height = render_height;
        self.display_width = display_width;
        self.display_height = display_height;

        // In production: recreate XeSS context with new dimensions
        // xessVulkanInit() needs to be called again
    }

    fn execute(
        &self,
        _cmd: vk::CommandBuffer,
        _color_input: vk::ImageView,
        _depth_input: vk::ImageView,
        _motion_vectors: vk::ImageView,
        _output: vk::ImageView,
    ) {
        if !self.initialized {
            return;
        }

        // In production, this would call:
        // xess_vk_execute_params_t params = {
        //     .inputWidth = render_width,
        //     .inputHeight = render_height,
        //     .jitterOffsetX = jitter_x,
        //     .jitterOffsetY = jitter_y,
        //     .exposureScale = 1.0,
        //     .resetHistory = false,
        //     .pColorTexture = color_input,
        //     .pVelocityTexture = motion_vectors,
        //     .pDepthTexture = depth_input,
        //     .pOutputTexture = output,
        // };
        // xessVulkanExecute(context, cmd, &params);
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        // In production:
        // xessDestroyContext(context)

        self.initialized = false;
    }
}

/// Get recommended XeSS settings for Quake 2 style games.
pub fn recommended_settings() -> XeSSInitFlags {
    XeSSInitFlags {
        high_res_mv: false,        // Low-res MV is fine for Q2's simple motion
        motion_vectors_ndc: false, // We use screen-space MVs
        motion_vectors_jittered: true, // Our MVs include jitter
        inverted_depth: false,     // Standard depth (0=near, 1=far)
        responsive_pixel_mask: true, // Good for thin objects like fences
        auto_exposure: false,      // Q2 doesn't have HDR exposure
    }
}
