use utoipa::{Modify, OpenApi};

use crate::features::transfers::{dtos as transfers_dtos, handlers as transfers_handlers};
use crate::shared::types::ApiResponse;

#[derive(OpenApi)]
#[openapi(
    paths(
        transfers_handlers::allocate_key,
        transfers_handlers::upload_file,
        transfers_handlers::download_file,
        transfers_handlers::get_session_status,
        transfers_handlers::delete_session,
    ),
    components(
        schemas(
            transfers_dtos::UploadFileDto,
            transfers_dtos::FileInfoDto,
            transfers_dtos::UploadResponseDto,
            transfers_dtos::SessionStatusDto,
            transfers_dtos::DeleteSessionResponseDto,
            ApiResponse<transfers_dtos::UploadResponseDto>,
            ApiResponse<transfers_dtos::SessionStatusDto>,
            ApiResponse<transfers_dtos::DeleteSessionResponseDto>,
        )
    ),
    tags(
        (name = "transfers", description = "Allocate keys, upload files to them and download them"),
    ),
    info(
        title = "Bookdrop API",
        version = "0.1.0",
        description = "Send a file to any device with a short code",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
