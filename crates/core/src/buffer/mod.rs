pub mod frame_ring_buffer;
