use crate::gpu::{DEPTH_FORMAT, WgpuFrame};
use crate::shaders;
use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use gridscene_assets::{MeshHandle, MeshTable, Vertex};
use gridscene_render::{CameraRig, RenderError, RenderSystem};
use gridscene_scene::SceneCollection;
use std::collections::BTreeMap;
use std::ops::Range;
use wgpu::util::DeviceExt;

/// The world is Y-down while wgpu clip space is Y-up.
const CLIP_Y_FLIP: Mat4 = Mat4::from_cols_array(&[
    1.0, 0.0, 0.0, 0.0, //
    0.0, -1.0, 0.0, 0.0, //
    0.0, 0.0, 1.0, 0.0, //
    0.0, 0.0, 0.0, 1.0,
]);

#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
struct CameraUniform {
    view_proj: [[f32; 4]; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct InstanceData {
    model: [[f32; 4]; 4],
}

/// A contiguous run of instances that share one mesh.
#[derive(Debug, Clone, PartialEq)]
struct Batch {
    mesh: MeshHandle,
    instances: Range<u32>,
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

/// Group scene objects by mesh, preserving scene order within each mesh.
fn build_instances(scene: &SceneCollection) -> (Vec<InstanceData>, Vec<Batch>) {
    let mut by_mesh: BTreeMap<MeshHandle, Vec<InstanceData>> = BTreeMap::new();
    for object in scene.iter() {
        by_mesh.entry(object.model).or_default().push(InstanceData {
            model: object.transform.matrix().to_cols_array_2d(),
        });
    }

    let mut instances = Vec::with_capacity(scene.len());
    let mut batches = Vec::with_capacity(by_mesh.len());
    for (mesh, group) in by_mesh {
        let start = instances.len() as u32;
        instances.extend(group);
        batches.push(Batch {
            mesh,
            instances: start..instances.len() as u32,
        });
    }
    (instances, batches)
}

fn clip_view_projection(camera: &CameraRig) -> Mat4 {
    CLIP_Y_FLIP * camera.view_projection()
}

/// Draws every game object as an instance of its mesh with one lit pipeline.
///
/// Meshes are uploaded once at construction. Instance data is rebuilt only
/// when the scene revision changes.
pub struct SimpleRenderSystem {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    meshes: Vec<Option<GpuMesh>>,
    instance_buffer: wgpu::Buffer,
    instance_capacity: u64,
    batches: Vec<Batch>,
    uploaded_revision: Option<u64>,
}

impl SimpleRenderSystem {
    /// Build the pipeline for a render pass with `surface_format` color and
    /// [`DEPTH_FORMAT`] depth, and upload every mesh in `meshes`.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        meshes: &MeshTable,
    ) -> Self {
        let camera_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("camera_buffer"),
            contents: bytemuck::bytes_of(&CameraUniform {
                view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            }),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("camera_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("camera_bind_group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("simple_pipeline_layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::SCENE_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("simple_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<Vertex>() as u64,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![
                            0 => Float32x3,
                            1 => Float32x3,
                            2 => Float32x3,
                            3 => Float32x2,
                        ],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: std::mem::size_of::<InstanceData>() as u64,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![
                            4 => Float32x4,
                            5 => Float32x4,
                            6 => Float32x4,
                            7 => Float32x4,
                        ],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            // The clip-space Y flip reverses winding, so nothing is culled.
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: Default::default(),
                bias: Default::default(),
            }),
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let gpu_meshes = meshes
            .iter()
            .map(|(handle, mesh)| {
                if mesh.indices.is_empty() {
                    tracing::warn!("mesh {} ({}) has no triangles", handle.index(), mesh.name);
                    return None;
                }
                let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_vertices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(&format!("{}_indices", mesh.name)),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                Some(GpuMesh {
                    vertex_buffer,
                    index_buffer,
                    index_count: mesh.index_count(),
                })
            })
            .collect();

        let instance_capacity = 1;
        let instance_buffer = create_instance_buffer(device, instance_capacity);

        Self {
            device: device.clone(),
            queue: queue.clone(),
            pipeline,
            camera_buffer,
            camera_bind_group,
            meshes: gpu_meshes,
            instance_buffer,
            instance_capacity,
            batches: Vec::new(),
            uploaded_revision: None,
        }
    }

    fn upload_instances(&mut self, scene: &SceneCollection) {
        if self.uploaded_revision == Some(scene.revision()) {
            return;
        }
        let (instances, batches) = build_instances(scene);
        let needed = instances.len() as u64;
        if needed > self.instance_capacity {
            self.instance_capacity = needed.next_power_of_two();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
            tracing::debug!("instance buffer grown to {} instances", self.instance_capacity);
        }
        if !instances.is_empty() {
            self.queue
                .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        }
        self.batches = batches;
        self.uploaded_revision = Some(scene.revision());
    }
}

impl RenderSystem<WgpuFrame> for SimpleRenderSystem {
    fn render_game_objects(
        &mut self,
        frame: &mut WgpuFrame,
        scene: &SceneCollection,
        camera: &CameraRig,
    ) -> Result<(), RenderError> {
        self.upload_instances(scene);
        self.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::bytes_of(&CameraUniform {
                view_proj: clip_view_projection(camera).to_cols_array_2d(),
            }),
        );

        let pass = frame
            .pass()
            .ok_or_else(|| RenderError::InvalidState("render pass not begun".into()))?;
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));

        for batch in &self.batches {
            let Some(Some(mesh)) = self.meshes.get(batch.mesh.index()) else {
                continue;
            };
            pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..mesh.index_count, 0, batch.instances.clone());
        }
        Ok(())
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: u64) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("instance_buffer"),
        size: capacity * std::mem::size_of::<InstanceData>() as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
