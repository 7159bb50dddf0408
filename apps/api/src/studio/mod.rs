// Content generation tools: graphic design, thumbnails, video editing and text-to-video.
// Only text-to-video reaches the generation API. The other tools hand back a job ticket.

pub mod handlers;
