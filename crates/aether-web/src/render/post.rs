use super::helpers::{self, HDR_FORMAT};
use super::targets::{bloom_size, RenderTargets};
use aether_core::BloomSettings;
use wgpu::util::DeviceExt;

/// Layout matches `struct PostUniforms` in `post.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub(crate) struct PostUniforms {
    pub(crate) resolution: [f32; 2],
    pub(crate) time: f32,
    pub(crate) bloom_strength: f32,
    pub(crate) blur_dir: [f32; 2],
    pub(crate) threshold: f32,
    pub(crate) chroma_offset: f32,
    pub(crate) grain: f32,
    pub(crate) audio: f32,
    pub(crate) _pad: [f32; 2],
}

/// One uniform buffer per pass. All four are written before the single
/// submit, so a shared buffer would leave every pass with the last write.
struct PassBuffers {
    bright: wgpu::Buffer,
    blur_h: wgpu::Buffer,
    blur_v: wgpu::Buffer,
    composite: wgpu::Buffer,
}

struct PassBindGroups {
    bright: wgpu::BindGroup,
    blur_h: wgpu::BindGroup,
    blur_v: wgpu::BindGroup,
    composite: wgpu::BindGroup,
    composite_bloom: wgpu::BindGroup,
}

pub(crate) struct PostResources {
    bgl0: wgpu::BindGroupLayout, // tex+sampler+uniform
    bgl1: wgpu::BindGroupLayout, // tex+sampler
    sampler: wgpu::Sampler,
    buffers: PassBuffers,
    groups: PassBindGroups,
    bright_pipeline: wgpu::RenderPipeline,
    blur_pipeline: wgpu::RenderPipeline,
    composite_pipeline: wgpu::RenderPipeline,
    bloom: BloomSettings,
}

fn uniform_buffer(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::bytes_of(&PostUniforms::default()),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

fn source_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    view: &wgpu::TextureView,
    sampler: &wgpu::Sampler,
    uniforms: Option<&wgpu::Buffer>,
) -> wgpu::BindGroup {
    let mut entries = vec![
        wgpu::BindGroupEntry {
            binding: 0,
            resource: wgpu::BindingResource::TextureView(view),
        },
        wgpu::BindGroupEntry {
            binding: 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        },
    ];
    if let Some(buf) = uniforms {
        entries.push(wgpu::BindGroupEntry {
            binding: 2,
            resource: buf.as_entire_binding(),
        });
    }
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &entries,
    })
}

impl PostResources {
    pub(crate) fn new(
        device: &wgpu::Device,
        targets: &RenderTargets,
        swap_format: wgpu::TextureFormat,
        bloom: BloomSettings,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("post_shader"),
            source: wgpu::ShaderSource::Wgsl(aether_core::POST_WGSL.into()),
        });
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("linear_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        let [tex0, samp0] = helpers::texture_sampler_entries(0);
        let bgl0 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl0"),
            entries: &[
                tex0,
                samp0,
                helpers::uniform_layout_entry(2, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let bgl1 = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("post_bgl1"),
            entries: &helpers::texture_sampler_entries(0),
        });
        let pl_single = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_0"),
            bind_group_layouts: &[&bgl0],
            push_constant_ranges: &[],
        });
        let pl_composite = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("pl_post_comp"),
            bind_group_layouts: &[&bgl0, &bgl1],
            push_constant_ranges: &[],
        });
        let bright_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_bright", HDR_FORMAT, None);
        let blur_pipeline =
            helpers::make_post_pipeline(device, &pl_single, &shader, "fs_blur", HDR_FORMAT, None);
        let composite_pipeline = helpers::make_post_pipeline(
            device,
            &pl_composite,
            &shader,
            "fs_composite",
            swap_format,
            Some(wgpu::BlendState::REPLACE),
        );
        let buffers = PassBuffers {
            bright: uniform_buffer(device, "post_bright_uniforms"),
            blur_h: uniform_buffer(device, "post_blur_h_uniforms"),
            blur_v: uniform_buffer(device, "post_blur_v_uniforms"),
            composite: uniform_buffer(device, "post_composite_uniforms"),
        };
        let groups = Self::build_groups(device, &bgl0, &bgl1, &sampler, &buffers, targets);
        Self {
            bgl0,
            bgl1,
            sampler,
            buffers,
            groups,
            bright_pipeline,
            blur_pipeline,
            composite_pipeline,
            bloom,
        }
    }

    fn build_groups(
        device: &wgpu::Device,
        bgl0: &wgpu::BindGroupLayout,
        bgl1: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        buffers: &PassBuffers,
        targets: &RenderTargets,
    ) -> PassBindGroups {
        PassBindGroups {
            bright: source_group(device, "bg_bright", bgl0, &targets.hdr_view, sampler, Some(&buffers.bright)),
            blur_h: source_group(device, "bg_blur_h", bgl0, &targets.bloom_a_view, sampler, Some(&buffers.blur_h)),
            blur_v: source_group(device, "bg_blur_v", bgl0, &targets.bloom_b_view, sampler, Some(&buffers.blur_v)),
            composite: source_group(
                device,
                "bg_composite",
                bgl0,
                &targets.hdr_view,
                sampler,
                Some(&buffers.composite),
            ),
            composite_bloom: source_group(device, "bg_bloom_a_only", bgl1, &targets.bloom_a_view, sampler, None),
        }
    }

    /// Bind groups reference the target views and must follow a resize.
    pub(crate) fn rebuild_bind_groups(&mut self, device: &wgpu::Device, targets: &RenderTargets) {
        self.groups = Self::build_groups(device, &self.bgl0, &self.bgl1, &self.sampler, &self.buffers, targets);
    }

    pub(crate) fn write_uniforms(&self, queue: &wgpu::Queue, width: u32, height: u32, time: f32, audio: f32) {
        let (bw, bh) = bloom_size(width, height);
        let base = PostUniforms {
            resolution: [bw as f32, bh as f32],
            time,
            bloom_strength: self.bloom.strength,
            blur_dir: [0.0, 0.0],
            threshold: self.bloom.threshold,
            chroma_offset: self.bloom.chroma_offset,
            grain: self.bloom.grain,
            audio,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.buffers.bright, 0, bytemuck::bytes_of(&base));
        let blur_h = PostUniforms {
            blur_dir: [1.0, 0.0],
            ..base
        };
        queue.write_buffer(&self.buffers.blur_h, 0, bytemuck::bytes_of(&blur_h));
        let blur_v = PostUniforms {
            blur_dir: [0.0, 1.0],
            ..base
        };
        queue.write_buffer(&self.buffers.blur_v, 0, bytemuck::bytes_of(&blur_v));
        let composite = PostUniforms {
            resolution: [width as f32, height as f32],
            ..base
        };
        queue.write_buffer(&self.buffers.composite, 0, bytemuck::bytes_of(&composite));
    }

    /// Bright pass, separable blur, then composite onto `target`.
    pub(crate) fn encode(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &RenderTargets,
        target: &wgpu::TextureView,
    ) {
        blit(
            encoder,
            "bright_pass",
            &targets.bloom_a_view,
            &self.bright_pipeline,
            &self.groups.bright,
            None,
        );
        blit(
            encoder,
            "blur_h",
            &targets.bloom_b_view,
            &self.blur_pipeline,
            &self.groups.blur_h,
            None,
        );
        blit(
            encoder,
            "blur_v",
            &targets.bloom_a_view,
            &self.blur_pipeline,
            &self.groups.blur_v,
            None,
        );
        blit(
            encoder,
            "composite",
            target,
            &self.composite_pipeline,
            &self.groups.composite,
            Some(&self.groups.composite_bloom),
        );
    }

    pub(crate) fn destroy(&self) {
        self.buffers.bright.destroy();
        self.buffers.blur_h.destroy();
        self.buffers.blur_v.destroy();
        self.buffers.composite.destroy();
    }
}

pub(crate) fn blit(
    encoder: &mut wgpu::CommandEncoder,
    label: &str,
    target: &wgpu::TextureView,
    pipeline: &wgpu::RenderPipeline,
    bg0: &wgpu::BindGroup,
    bg1: Option<&wgpu::BindGroup>,
) {
    let mut r = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some(label),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                store: wgpu::StoreOp::Store,
            },
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
    });
    r.set_pipeline(pipeline);
    r.set_bind_group(0, bg0, &[]);
    if let Some(g1) = bg1 {
        r.set_bind_group(1, g1, &[]);
    }
    r.draw(0..3, 0..1);
}
