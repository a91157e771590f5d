//! Tile-based GPU Optimizations (VK_EXT_shader_tile_image)
//!
//! Efficient access to framebuffer data on tile-based GPUs:
//! - Read color/depth/stencil within tile without going to memory
//! - Programmable blending
//! - Deferred shading within tile
//! - Reduce bandwidth on mobile/integrated GPUs

use ash::vk;

/// Shader tile image capabilities.
#[derive(Debug, Clone, Default)]
pub struct ShaderTileImageCapabilities {
    /// Whether shader tile image is supported.
    pub supported: bool,
    /// Whether color read is supported.
    pub shader_tile_image_color_read_access: bool,
    /// Whether depth read is supported.
    pub shader_tile_image_depth_read_access: bool,
    /// Whether stencil read is supported.
    pub shader_tile_image_stencil_read_access: bool,
    /// Whether coherent read is supported.
    pub shader_tile_image_coherent_read_access: bool,
}

/// Query shader tile image capabilities.
pub fn query_capabilities(ctx: &super::context::VulkanContext) -> ShaderTileImageCapabilities {
    let mut tile_features = vk::PhysicalDeviceShaderTileImageFeaturesEXT::default();
    let mut features2 = vk::PhysicalDeviceFeatures2::default()
        .push_next(&mut tile_features);

    unsafe {
        ctx.instance.get_physical_device_features2(ctx.physical_device, &mut features2);
    }

    let _ = features2;

    ShaderTileImageCapabilities {
        supported: tile_features.shader_tile_image_color_read_access == vk::TRUE
            || tile_features.shader_tile_image_depth_read_access == vk::TRUE
            || tile_features.shader_tile_image_stencil_read_access == vk::TRUE,
        shader_tile_image_color_read_access: tile_features.shader_tile_image_color_read_access == vk::TRUE,
        shader_tile_image_depth_read_access: tile_features.shader_tile_image_depth_read_access == vk::TRUE,
        shader_tile_image_stencil_read_access: tile_features.shader_tile_image_stencil_read_access == vk::TRUE,
        shader_tile_image_coherent_read_access: false, // Not directly exposed in Vulkan features
    }
}

/// Tile properties.
#[derive(Debug, Clone, Default)]
pub struct TileProperties {
    /// Tile width in pixels.
    pub tile_width: u32,
    /// Tile height in pixels.
    pub tile_height: u32,
    /// Maximum tile memory size.
    pub max_tile_memory: u32,
}

/// Query tile properties for the device.
pub fn query_tile_properties(ctx: &super::context::VulkanContext) -> TileProperties {
    // Tile size is typically hardware-specific
    // Common values: 16x16, 32x32, or variable
    // Would need VK_EXT_shader_tile_image_properties or similar

    // Default estimates for common tile-based GPUs
    TileProperties {
        tile_width: 32,
        tile_height: 32,
        max_tile_memory: 128 * 1024, // 128KB typical
    }
}

/// GLSL code for shader tile image access.
pub mod glsl {
    /// Extension declarations.
    pub const EXTENSIONS: &str = r#"
#extension GL_EXT_shader_tile_image : require
"#;

    /// Tile image declarations.
    pub const DECLARATIONS: &str = r#"
// Tile image variables are implicitly declared when extension is enabled
// Access the current fragment's framebuffer data:
// - color_attachment_0, color_attachment_1, etc.
// - depth_attachment
// - stencil_attachment

// Read color from tile
vec4 readTileColor(int attachmentIndex) {
    switch(attachmentIndex) {
        case 0: return tileImageLoadColor(0);
        case 1: return tileImageLoadColor(1);
        case 2: return tileImageLoadColor(2);
        case 3: return tileImageLoadColor(3);
        default: return vec4(0.0);
    }
}

// Read depth from tile
float readTileDepth() {
    return tileImageLoadDepth();
}

// Read stencil from tile
uint readTileStencil() {
    return tileImageLoadStencil();
}
"#;

    /// Programmable blending.
    pub const PROGRAMMABLE_BLEND: &str = r#"
// Programmable blending using tile image
// This allows complex blend operations not possible with fixed-function

// Custom additive blend with saturation
vec4 customAdditiveBlend(vec4 src, vec4 dst) {
    return min(src + dst, vec4(1.0));
}

// Multiply blend
vec4 multiplyBlend(vec4 src, vec4 dst) {
    return src * dst;
}

// Screen blend
vec4 screenBlend(vec4 src, vec4 dst) {
    return 1.0 - (1.0 - src) * (1.0 - dst);
}

// Overlay blend
vec4 overlayBlend(vec4 src, vec4 dst) {
    vec4 result;
    for (int i = 0; i < 4; i++) {
        if (dst[i] < 0.5) {
            result[i] = 2.0 * src[i] * dst[i];
        } else {
            result[i] = 1.0 - 2.0 * (1.0 - src[i]) * (1.0 - dst[i]);
        }
    }
    return result;
}

// Soft light blend
vec4 softLightBlend(vec4 src, vec4 dst) {
    vec4 result;
    for (int i = 0; i < 4; i++) {
        if (src[i] < 0.5) {
            result[i] = dst[i] - (1.0 - 2.0 * src[i]) * dst[i] * (1.0 - dst[i]);
        } else {
            float d = dst[i] <= 0.25 ?
                ((16.0 * dst[i] - 12.0) * dst[i] + 4.0) * dst[i] :
                sqrt(dst[i]);
            result[i] = dst[i] + (2.0 * src[i] - 1.0) * (d - dst[i]);
        }
    }
    return result;
}
"#;

    /// Deferred shading in tile.
    pub const DEFERRED_TILE: &str = r#"
// Single-pass deferred shading using tile image
// GBuffer stored in color attachments, lighting computed in same pass

struct GBufferData {
    vec3 albedo;
    vec3 normal;
    float roughness;
    float metallic;
    vec3 emissive;
};

// Read GBuffer from tile
GBufferData readGBufferFromTile() {
    GBufferData gb;

    vec4 gbuffer0 = tileImageLoadColor(0); // RGB: albedo, A: roughness
    vec4 gbuffer1 = tileImageLoadColor(1); // RGB: normal (encoded), A: metallic
    vec4 gbuffer2 = tileImageLoadColor(2); // RGB: emissive

    gb.albedo = gbuffer0.rgb;
    gb.roughness = gbuffer0.a;
    gb.normal = normalize(gbuffer1.rgb * 2.0 - 1.0);
    gb.metallic = gbuffer1.a;
    gb.emissive = gbuffer2.rgb;

    return gb;
}

// Lighting pass reading from tile
vec4 tileDeferredLighting(GBufferData gb, vec3 worldPos, vec3 viewDir,
                           vec3 lightDir, vec3 lightColor) {
    // Simple PBR lighting
    vec3 H = normalize(viewDir + lightDir);
    float NdotL = max(dot(gb.normal, lightDir), 0.0);
    float NdotV = max(dot(gb.normal, viewDir), 0.0);
    float NdotH = max(dot(gb.normal, H), 0.0);

    // Fresnel
    vec3 F0 = mix(vec3(0.04), gb.albedo, gb.metallic);
    vec3 F = F0 + (1.0 - F0) * pow(1.0 - NdotV, 5.0);

    // Diffuse
    vec3 diffuse = gb.albedo * (1.0 - gb.metallic) * (1.0 - F);

    // Specular (simplified)
    float a = gb.roughness * gb.roughness;
    float D = a / (3.14159265 * pow(NdotH * NdotH * (a - 1.0) + 1.0, 2.0));
    vec3 specular = F * D * 0.25;

    vec3 lighting = (diffuse + specular) * lightColor * NdotL;
    lighting += gb.emissive;

    return vec4(lighting, 1.0);
}
"#;

    /// Order-independent transparency.
    pub const OIT_TILE: &str = r#"
// Order-Independent Transparency using tile image
// Weighted blended OIT accumulation

struct OitData {
    vec4 accumColor;  // Premultiplied color accumulation
    float accumAlpha; // Alpha accumulation for normalization
    float revealage;  // Product of (1 - alpha)
};

// Weight function for OIT
float oitWeight(float depth, float alpha) {
    return alpha * max(0.01, min(3000.0,
        10.0 / (0.00001 + pow(abs(depth) / 5.0, 2.0) +
                         pow(abs(depth) / 200.0, 6.0))));
}

// Accumulate transparent fragment
void oitAccumulate(vec4 color, float depth, inout OitData oit) {
    float weight = oitWeight(depth, color.a);

    oit.accumColor += vec4(color.rgb * color.a, color.a) * weight;
    oit.revealage *= 1.0 - color.a;
}

// Composite OIT result with background
vec4 oitComposite(OitData oit, vec4 background) {
    // Prevent division by zero
    float alpha = 1.0 - oit.revealage;
    if (alpha < 0.0001) {
        return background;
    }

    vec3 avgColor = oit.accumColor.rgb / max(oit.accumColor.a, 0.0001);
    return vec4(avgColor * alpha + background.rgb * oit.revealage, 1.0);
}
"#;

    /// Depth-aware effects.
    pub const DEPTH_EFFECTS: &str = r#"
// Depth-based effects using tile depth access

// Soft particle fade
float softParticleFade(float particleDepth, float sceneDepth, float fadeDistance) {
    float diff = sceneDepth - particleDepth;
    return smoothstep(0.0, fadeDistance, diff);
}

// Contact shadows (screen-space)
float tileContactShadow(vec3 worldPos, vec3 lightDir, mat4 viewProj,
                         float maxDistance, int steps) {
    vec3 rayPos = worldPos;
    vec3 rayStep = lightDir * maxDistance / float(steps);

    for (int i = 0; i < steps; i++) {
        rayPos += rayStep;

        vec4 projPos = viewProj * vec4(rayPos, 1.0);
        projPos.xyz /= projPos.w;

        if (projPos.x < -1.0 || projPos.x > 1.0 ||
            projPos.y < -1.0 || projPos.y > 1.0) {
            break;
        }

        float sceneDepth = tileImageLoadDepth();
        float rayDepth = projPos.z;

        if (rayDepth > sceneDepth + 0.001) {
            return 0.0; // Occluded
        }
    }

    return 1.0; // Not occluded
}
"#;

    /// Fragment shader with tile image.
    pub const TILE_SHADER_EXAMPLE: &str = r#"
#version 450
#extension GL_EXT_shader_tile_image : require

layout(location = 0) out vec4 fragColor;

layout(push_constant) uniform PushConstants {
    int blendMode;
    float blendFactor;
} pc;

void main() {
    // Compute new fragment color
    vec4 newColor = computeColor(); // Your shading code

    // Read existing color from tile
    vec4 existingColor = tileImageLoadColor(0);

    // Apply programmable blend based on mode
    vec4 blended;
    switch(pc.blendMode) {
        case 0: // Normal
            blended = mix(existingColor, newColor, newColor.a);
            break;
        case 1: // Additive
            blended = existingColor + newColor;
            break;
        case 2: // Multiply
            blended = existingColor * newColor;
            break;
        case 3: // Screen
            blended = 1.0 - (1.0 - existingColor) * (1.0 - newColor);
            break;
        default:
            blended = newColor;
    }

    fragColor = mix(existingColor, blended, pc.blendFactor);
}
"#;
}

/// Tile-based rendering configuration.
#[derive(Debug, Clone)]
pub struct TileRenderConfig {
    /// Enable tile-based color read.
    pub color_read: bool,
    /// Enable tile-based depth read.
    pub depth_read: bool,
    /// Enable tile-based stencil read.
    pub stencil_read: bool,
    /// Use coherent reads (sync between invocations).
    pub coherent_read: bool,
    /// Enable programmable blending.
    pub programmable_blend: bool,
    /// Enable tile-based deferred.
    pub tile_deferred: bool,
}

impl Default for TileRenderConfig {
    fn default() -> Self {
        Self {
            color_read: true,
            depth_read: true,
            stencil_read: false,
            coherent_read: false,
            programmable_blend: false,
            tile_deferred: false,
        }
    }
}

/// Tile-based rendering manager.
pub struct ShaderTileImageManager {
    capabilities: ShaderTileImageCapabilities,
    tile_properties: TileProperties,
    config: TileRenderConfig,
}

impl ShaderTileImageManager {
    /// Create new manager.
    pub fn new(ctx: &super::context::VulkanContext) -> Self {
        let capabilities = query_capabilities(ctx);
        let tile_properties = query_tile_properties(ctx);

        Self {
            capabilities,
            tile_properties,
            config: TileRenderConfig::default(),
        }
    }

    /// Check if shader tile image is supported.
    pub fn is_supported(&self) -> bool {
        self.capabilities.supported
    }

    /// Check if specific feature is available.
    pub fn supports_color_read(&self) -> bool {
        self.capabilities.shader_tile_image_color_read_access
    }

    pub fn supports_depth_read(&self) -> bool {
        self.capabilities.shader_tile_image_depth_read_access
    }

    pub fn supports_stencil_read(&self) -> bool {
        self.capabilities.shader_tile_image_stencil_read_access
    }

    pub fn supports_coherent_read(&self) -> bool {
        self.capabilities.shader_tile_image_coherent_read_access
    }

    /// Get tile dimensions.
    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_properties.tile_width, self.tile_properties.tile_height)
    }

    /// Calculate number of tiles for resolution.
    pub fn calculate_tile_count(&self, width: u32, height: u32) -> (u32, u32) {
        let tiles_x = (width + self.tile_properties.tile_width - 1) / self.tile_properties.tile_width;
        let tiles_y = (height + self.tile_properties.tile_height - 1) / self.tile_properties.tile_height;
        (tiles_x, tiles_y)
    }

    /// Set configuration.
    pub fn set_config(&mut self, config: TileRenderConfig) {
        self.config = config;
    }

    /// Get current configuration.
    pub fn config(&self) -> &TileRenderConfig {
        &self.config
    }

    /// Estimate bandwidth savings from tile-based access.
    pub fn estimate_bandwidth_savings(
        &self,
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        reads_per_pixel: u32,
    ) -> u64 {
        if !self.is_supported() {
            return 0;
        }

        // With tile image, reads stay on-chip instead of going to memory
        let pixels = width as u64 * height as u64;
        let saved_reads = pixels * reads_per_pixel as u64 * bytes_per_pixel as u64;

        saved_reads
    }
}

/// Rendering hints for tile-based optimization.
#[derive(Debug, Clone)]
pub struct TileRenderHints {
    /// Prefer storing intermediate results in tile memory.
    pub prefer_tile_storage: bool,
    /// Group draw calls by material to maximize tile reuse.
    pub material_batching: bool,
    /// Clear attachments at render pass start (better for tile memory).
    pub clear_on_load: bool,
    /// Don't store attachments that won't be read later.
    pub discard_transient: bool,
}

impl Default for TileRenderHints {
    fn default() -> Self {
        Self {
            prefer_tile_storage: true,
            material_batching: true,
            clear_on_load: true,
            discard_transient: true,
        }
    }
}
