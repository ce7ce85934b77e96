//! Fixture crate compiling what twinway generates for `shop.proto`.
//!
//! `build.rs` produces the tonic server with `tonic_build::manual` and the
//! twinway descriptor and implementation stub with `twinway_codegen`. The
//! messages below are what prost-build emits for the file, with the serde
//! attributes from `twinway_codegen::MESSAGE_ATTRIBUTES`.

pub mod shop {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GetItemRequest {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(string, tag = "2")]
        pub note: String,
        #[prost(bool, tag = "3")]
        pub verbose: bool,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Item {
        #[prost(string, tag = "1")]
        pub sku: String,
        #[prost(double, tag = "2")]
        pub price: f64,
        #[prost(string, repeated, tag = "3")]
        pub tags: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct UpdateItemRequest {
        #[prost(int64, tag = "1")]
        pub id: i64,
        #[prost(message, optional, tag = "2")]
        pub item: Option<Item>,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct GetSkuRequest {
        #[prost(string, tag = "1")]
        pub sku: String,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SearchRequest {
        #[prost(string, tag = "1")]
        pub query: String,
        #[prost(uint32, tag = "2")]
        pub limit: u32,
        #[prost(string, repeated, tag = "3")]
        pub tags: Vec<String>,
    }

    #[derive(Clone, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct SearchResponse {
        #[prost(string, tag = "1")]
        pub echo: String,
        #[prost(message, repeated, tag = "2")]
        pub items: Vec<Item>,
    }

    #[derive(Clone, Copy, PartialEq, prost::Message, Serialize, Deserialize)]
    #[serde(default)]
    pub struct Ping {}

    include!(concat!(env!("OUT_DIR"), "/shop.Items.rs"));
    include!(concat!(env!("OUT_DIR"), "/shop.twinway.rs"));
}

pub mod implementation {
    include!(concat!(env!("OUT_DIR"), "/shop.impl.rs"));
}
