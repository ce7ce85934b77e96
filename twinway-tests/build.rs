use std::path::PathBuf;

use tonic_build::manual;
use twinway_codegen::{
    generate, Binding, Body, FileDescriptor, GenerationContext, GeneratorOptions, HttpMethod,
    Method, ScalarType, Service, TypeRef,
};

const PACKAGE: &str = "shop";
const SWAGGER: &[u8] = br#"{"swagger":"2.0","info":{"title":"shop"}}"#;

fn ty(name: &str) -> TypeRef {
    TypeRef::new(PACKAGE, name)
}

/// HTTP bindings of `shop.proto`.
fn shop_file() -> FileDescriptor {
    FileDescriptor::new("shop.proto", PACKAGE).with_service(
        Service::new("Items")
            .with_method(
                Method::new("GetItem", ty("GetItemRequest"), ty("Item")).with_binding(
                    Binding::new(HttpMethod::Get, "/v1/items/{id}")
                        .with_path_param("id", ScalarType::Int64)
                        .with_wildcard_query(),
                ),
            )
            .with_method(
                Method::new("UpdateItem", ty("UpdateItemRequest"), ty("Item")).with_binding(
                    Binding::new(HttpMethod::Put, "/v1/items/{id}")
                        .with_path_param("id", ScalarType::Int64)
                        .with_body(Body::field("item", true)),
                ),
            )
            .with_method(
                Method::new("GetSku", ty("GetSkuRequest"), ty("Item")).with_binding(
                    Binding::new(HttpMethod::Get, "/v1/skus/{sku}")
                        .with_path_param("sku", ScalarType::String),
                ),
            )
            .with_method(
                Method::new("Search", ty("SearchRequest"), ty("SearchResponse"))
                    .with_binding(Binding::new(HttpMethod::Get, "/v1/search").with_wildcard_query())
                    .with_binding(Binding::new(HttpMethod::Post, "/v1/search").with_body(Body::whole())),
            )
            .with_method(Method::new("Ping", ty("Ping"), ty("Ping"))),
    )
}

fn grpc_method(name: &str, route: &str, input: &str, output: &str) -> manual::Method {
    manual::Method::builder()
        .name(name)
        .route_name(route)
        .input_type(format!("super::{input}"))
        .output_type(format!("super::{output}"))
        .codec_path("tonic::codec::ProstCodec")
        .build()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=build.rs");
    let out_dir = PathBuf::from(std::env::var("OUT_DIR")?);

    let items = manual::Service::builder()
        .name("Items")
        .package(PACKAGE)
        .method(grpc_method("get_item", "GetItem", "GetItemRequest", "Item"))
        .method(grpc_method("update_item", "UpdateItem", "UpdateItemRequest", "Item"))
        .method(grpc_method("get_sku", "GetSku", "GetSkuRequest", "Item"))
        .method(grpc_method("search", "Search", "SearchRequest", "SearchResponse"))
        .method(grpc_method("ping", "Ping", "Ping", "Ping"))
        .build();
    manual::Builder::new()
        .build_client(false)
        .out_dir(&out_dir)
        .compile(&[items]);

    let file = shop_file();
    let options = GeneratorOptions::from_parameter("impl_module=crate::shop")?;
    let ctx = GenerationContext::for_file(&file, &options, Some(SWAGGER.to_vec()));
    let artifacts = generate(&file, &ctx)?;
    for artifact in [artifacts.descriptor, artifacts.implementation] {
        std::fs::write(out_dir.join(&artifact.name), artifact.content)?;
    }
    Ok(())
}
