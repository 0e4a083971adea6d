// External Service Adapters
//
// Concrete reqwest-based clients for the catalog and server adapters named
// in the external interfaces module: the media server (C4), TMDb (C5),
// Douban (C6), the translation engine set (C8), and the download-automation
// adapter used by the custom collection engine's auto-subscribe task (C14).

pub mod douban;
pub mod media_server;
pub mod subscribe;
pub mod tmdb;
pub mod translators;
