//! wgpu compute pipeline for the intersection kernel.

use std::marker::PhantomData;

use bytemuck::{Pod, Zeroable};
use raybatch_gpu::{GpuContext, GpuError};
use wgpu::util::DeviceExt;

use crate::buffer::HitBuffer;
use crate::error::{KernelError, Result};
use crate::settings::DispatchSettings;
use crate::shape::Shape;
use crate::variant::KernelVariant;
use crate::Ray;

/// Batch sizes passed to the shader as a uniform.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuParams {
    /// Number of valid rays; invocations past it return immediately.
    pub ray_count: u32,
    /// Number of valid shapes.
    pub shape_count: u32,
    /// Padding.
    pub _pad: [u32; 2],
}

impl GpuParams {
    /// Counts for one batch.
    pub fn new(rays: &[Ray], shapes: &[Shape]) -> Result<Self> {
        let count = |n: usize| {
            u32::try_from(n).map_err(|_| KernelError::BatchTooLarge {
                rays: rays.len(),
                limit: u32::MAX as usize,
            })
        };
        Ok(Self {
            ray_count: count(rays.len())?,
            shape_count: count(shapes.len())?,
            _pad: [0; 2],
        })
    }
}

/// Intersection compute pipeline for kernel variant `V`.
pub struct IntersectPipeline<V: KernelVariant> {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    settings: DispatchSettings,
    _variant: PhantomData<V>,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl<V: KernelVariant> IntersectPipeline<V> {
    /// Compile the shader for `V` with the settings' workgroup size.
    pub fn new(ctx: &GpuContext, settings: &DispatchSettings) -> Result<Self> {
        settings.validate()?;

        let source = super::shaders::intersect_source::<V>(settings.workgroup_size);
        let shader_module = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Intersect Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let layout_desc = wgpu::BindGroupLayoutDescriptor {
            label: Some("Intersect Bind Group Layout"),
            entries: &[
                // Rays
                storage_entry(0, true),
                // Shapes
                storage_entry(1, true),
                // Hit records
                storage_entry(2, false),
                // Params uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        };
        let bind_group_layout = ctx.device.create_bind_group_layout(&layout_desc);

        let pipeline_layout = ctx.device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Intersect Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = ctx.device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(V::NAME),
            layout: Some(&pipeline_layout),
            module: &shader_module,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            pipeline,
            bind_group_layout,
            settings: settings.clone(),
            _variant: PhantomData,
        })
    }

    /// Intersect `rays` with `shapes` on the device.
    ///
    /// The output is pre-filled with empty slots before dispatch, so the
    /// returned buffer's per-ray hit counts are exact.
    pub fn run(&self, ctx: &GpuContext, rays: &[Ray], shapes: &[Shape]) -> Result<HitBuffer<V>> {
        let mut output = HitBuffer::<V>::new(rays.len());
        if rays.is_empty() {
            return Ok(output);
        }

        let workgroups = self
            .settings
            .dispatch_workgroups(rays.len(), ctx.limits.max_compute_workgroups_per_dimension)?;
        log::debug!(
            "{} gpu kernel: {} rays x {} shapes, {} workgroups of {}",
            V::NAME,
            rays.len(),
            shapes.len(),
            workgroups,
            self.settings.workgroup_size,
        );

        // At least one element to avoid a zero-size binding
        let padded_shapes = [Shape::zeroed()];
        let shape_data = if shapes.is_empty() {
            &padded_shapes[..]
        } else {
            shapes
        };
        ctx.check_storage_binding("ray", std::mem::size_of_val(rays) as u64)?;
        ctx.check_storage_binding("shape", std::mem::size_of_val(shape_data) as u64)?;
        ctx.check_storage_binding("hit", output.as_bytes().len() as u64)?;

        let params = GpuParams::new(rays, shapes)?;
        let params_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Params Buffer"),
            contents: bytemuck::bytes_of(&params),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let ray_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ray Buffer"),
            contents: bytemuck::cast_slice(rays),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let shape_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Shape Buffer"),
            contents: bytemuck::cast_slice(shape_data),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let hit_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Hit Buffer"),
            contents: output.as_bytes(),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        });
        let output_size = hit_buffer.size();

        let readback_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Intersect Bind Group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: ray_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: shape_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: hit_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        let mut encoder = ctx.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Intersect Encoder"),
        });

        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Intersect Pass"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.dispatch_workgroups(workgroups, 1, 1);
        }

        encoder.copy_buffer_to_buffer(&hit_buffer, 0, &readback_buffer, 0, output_size);
        ctx.queue.submit(Some(encoder.finish()));

        let buffer_slice = readback_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });
        ctx.device.poll(wgpu::Maintain::Wait);
        rx.recv()
            .map_err(|_| GpuError::BufferMapping)?
            .map_err(|_| GpuError::BufferMapping)?;

        {
            let data = buffer_slice.get_mapped_range();
            output
                .as_mut_slice()
                .copy_from_slice(bytemuck::cast_slice(&data));
        }
        readback_buffer.unmap();

        Ok(output)
    }
}

/// Initialize the shared context, build a pipeline for `V` and run one batch
/// (native only).
#[cfg(not(target_arch = "wasm32"))]
pub fn execute_blocking<V: KernelVariant>(
    rays: &[Ray],
    shapes: &[Shape],
    settings: &DispatchSettings,
) -> Result<HitBuffer<V>> {
    let ctx = GpuContext::init_blocking()?;
    let pipeline = IntersectPipeline::<V>::new(ctx, settings)?;
    pipeline.run(ctx, rays, shapes)
}
