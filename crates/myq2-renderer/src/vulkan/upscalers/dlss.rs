//! NVIDIA DLSS (Deep Learning Super Sampling) integration
//!
//! DLSS uses deep learning to produce high-quality upscaled images that approach
//! or exceed native resolution quality. This requires:
//! - NVIDIA RTX GPU (Turing or newer)
//! - NVIDIA NGX SDK (proprietary, users must provide their own)
//!
//! The DLSS SDK provides precompiled neural network models optimized for each
//! quality preset. Motion vectors and depth are used to maintain temporal stability.

use ash::vk;
use super::{Upscaler, UpscalerBackend, UpscalerQuality};

/// DLSS quality mode (maps to NGX presets).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum DlssQualityMode {
    /// Ultra Performance - 3x upscaling
    UltraPerformance = 0,
    /// Performance - 2x upscaling
    Performance = 1,
    /// Balanced - 1.7x upscaling
    Balanced = 2,
    /// Quality - 1.5x upscaling
    Quality = 3,
    /// Ultra Quality - 1.3x upscaling
    UltraQuality = 4,
    /// DLAA - native resolution AA
    Dlaa = 5,
}

impl From<UpscalerQuality> for DlssQualityMode {
    fn from(quality: UpscalerQuality) -> Self {
        match quality {
            UpscalerQuality::UltraPerformance => DlssQualityMode::UltraPerformance,
            UpscalerQuality::Performance => DlssQualityMode::Performance,
            UpscalerQuality::Balanced => DlssQualityMode::Balanced,
            UpscalerQuality::Quality => DlssQualityMode::Quality,
            UpscalerQuality::UltraQuality => DlssQualityMode::UltraQuality,
            UpscalerQuality::NativeAA => DlssQualityMode::Dlaa,
        }
    }
}

/// Halton sequence for jitter (same as FSR 2.0).
const JITTER_SAMPLES: usize = 64;

/// DLSS upscaler instance.
pub struct DlssUpscaler {
    /// Whether DLSS is available on this system.
    available: bool,
    /// Whether DLSS is initialized.
    initialized: bool,
    /// Current quality preset.
    quality: UpscalerQuality,
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
    // NGX SDK handles would go here:
    // ngx_context: *mut c_void,
    // ngx_feature: *mut c_void,
}

impl DlssUpscaler {
    /// Create a new DLSS upscaler.
    pub fn new(ctx: &super::super::context::VulkanContext) -> Option<Self> {
        // Check for NVIDIA GPU
        let props = unsafe {
            ctx.instance.get_physical_device_properties(ctx.physical_device)
        };

        // NVIDIA vendor ID is 0x10DE
        let is_nvidia = props.vendor_id == 0x10DE;

        if !is_nvidia {
            return None;
        }

        // Check for RTX capabilities (Turing or newer)
        // This is a simplified check - in production, use NGX SDK to verify
        let is_rtx = ctx.rt_capabilities.supported;

        let available = is_nvidia && is_rtx;

        // Generate Halton jitter sequence
        let jitter_sequence = Self::generate_halton_sequence();

        Some(Self {
            available,
            initialized: false,
            quality: UpscalerQuality::Quality,
            jitter_index: 0,
            jitter_sequence,
            render_width: 0,
            render_height: 0,
            display_width: 0,
            display_height: 0,
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

    /// Initialize DLSS with the NGX SDK.
    ///
    /// This requires the NGX SDK to be available. The SDK path should be
    /// provided via the `NGX_SDK_PATH` environment variable or placed in
    /// a standard location.
    pub fn initialize(&mut self) -> Result<(), String> {
        if self.initialized {
            return Ok(());
        }

        if !self.available {
            return Err("DLSS not available on this hardware".to_string());
        }

        // In production, this would:
        // 1. Load nvngx_dlss.dll
        // 2. Call NVSDK_NGX_VULKAN_Init()
        // 3. Call NVSDK_NGX_VULKAN_CreateFeature() for DLSS
        //
        // For now, we just mark as initialized (NGX calls would go here)

        // Placeholder: DLSS SDK integration would go here
        // Users need to provide their own NGX SDK due to licensing

        self.initialized = true;
        Ok(())
    }

    /// Get optimal render resolution for the current quality and display size.
    pub fn optimal_render_size(&self, display_width: u32, display_height: u32) -> (u32, u32) {
        let scale = self.quality.render_scale();
        let render_width = ((display_width as f32) * scale) as u32;
        let render_height = ((display_height as f32) * scale) as u32;
        (render_width.max(1), render_height.max(1))
    }
}

impl Upscaler for DlssUpscaler {
    fn is_available(&self) -> bool {
        self.available
    }

    fn backend(&self) -> UpscalerBackend {
        UpscalerBackend::Dlss
    }

    fn quality(&self) -> UpscalerQuality {
        self.quality
    }

    fn set_quality(&mut self, quality: UpscalerQuality) {
        self.quality = quality;
        // In production: update NGX feature with new quality mode
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

        // In production: recreate NGX feature with new dimensions
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
        // NVSDK_NGX_VULKAN_EvaluateFeature(cmd_buffer, feature, params, NULL)
        //
        // Where params contains:
        // - NVSDK_NGX_Parameter_Color: color_input
        // - NVSDK_NGX_Parameter_Depth: depth_input
        // - NVSDK_NGX_Parameter_MotionVectors: motion_vectors
        // - NVSDK_NGX_Parameter_Output: output
        // - NVSDK_NGX_Parameter_Jitter_Offset_X/Y: jitter values
        // - NVSDK_NGX_Parameter_MV_Scale_X/Y: motion vector scale
        // - NVSDK_NGX_Parameter_Reset: frame reset flag
    }

    fn shutdown(&mut self) {
        if !self.initialized {
            return;
        }

        // In production:
        // NVSDK_NGX_VULKAN_ReleaseFeature(feature)
        // NVSDK_NGX_VULKAN_Shutdown()

        self.initialized = false;
    }
}
