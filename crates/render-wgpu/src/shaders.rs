/// WGSL shader for instanced, directionally lit meshes.
///
/// Lighting happens in world space, which is Y-down; the light comes from
/// above and slightly in front of the origin.
pub const SCENE_SHADER: &str = r#"
struct Camera {
    view_proj: mat4x4<f32>,
};

@group(0) @binding(0)
var<uniform> camera: Camera;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) color: vec3<f32>,
    @location(2) normal: vec3<f32>,
    @location(3) uv: vec2<f32>,
};

struct InstanceInput {
    @location(4) model_0: vec4<f32>,
    @location(5) model_1: vec4<f32>,
    @location(6) model_2: vec4<f32>,
    @location(7) model_3: vec4<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) color: vec3<f32>,
};

const DIRECTION_TO_LIGHT: vec3<f32> = vec3<f32>(0.30151135, -0.90453404, -0.30151135);
const AMBIENT: f32 = 0.02;

@vertex
fn vs_main(vertex: VertexInput, instance: InstanceInput) -> VertexOutput {
    let model = mat4x4<f32>(
        instance.model_0,
        instance.model_1,
        instance.model_2,
        instance.model_3,
    );
    let world_pos = model * vec4<f32>(vertex.position, 1.0);
    let n = (model * vec4<f32>(vertex.normal, 0.0)).xyz;
    let len = length(n);
    let world_normal = select(vec3<f32>(0.0), n / len, len > 0.0);
    let intensity = AMBIENT + max(dot(world_normal, DIRECTION_TO_LIGHT), 0.0);

    var out: VertexOutput;
    out.clip_position = camera.view_proj * world_pos;
    out.color = intensity * vertex.color;
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(in.color, 1.0);
}
"#;
