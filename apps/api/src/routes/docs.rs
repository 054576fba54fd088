use axum::Json;
use serde_json::{json, Value};

/// GET /docs
/// OpenAPI 3.0 description of the public routes.
pub async fn openapi_handler() -> Json<Value> {
    Json(openapi_document())
}

fn detail_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": { "schema": { "$ref": "#/components/schemas/ErrorDetail" } }
        }
    })
}

pub fn openapi_document() -> Value {
    json!({
        "openapi": "3.0.3",
        "info": {
            "title": "Competitor Analysis API",
            "description": "API for analyzing competitor data and market intelligence",
            "version": env!("CARGO_PKG_VERSION")
        },
        "paths": {
            "/": {
                "get": {
                    "summary": "Service info and links",
                    "responses": { "200": { "description": "Welcome message" } }
                }
            },
            "/health": {
                "get": {
                    "summary": "Liveness check",
                    "responses": {
                        "200": {
                            "description": "Service is up",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "type": "object",
                                        "properties": {
                                            "status": { "type": "string", "example": "healthy" },
                                            "version": { "type": "string" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "/api/v1/competitor-analysis": {
                "post": {
                    "summary": "Run a competitor analysis prompt chain",
                    "parameters": [{
                        "name": "mode",
                        "in": "query",
                        "required": false,
                        "schema": { "type": "string", "enum": ["competitor-breakdown", "positioning"] }
                    }],
                    "requestBody": {
                        "required": true,
                        "content": {
                            "application/json": {
                                "schema": { "$ref": "#/components/schemas/AnalysisRequest" }
                            }
                        }
                    },
                    "responses": {
                        "200": {
                            "description": "Complete analysis for the selected mode",
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "oneOf": [
                                            { "$ref": "#/components/schemas/CompetitorBreakdown" },
                                            { "$ref": "#/components/schemas/Positioning" }
                                        ]
                                    }
                                }
                            }
                        },
                        "422": detail_response("Invalid request body or mode"),
                        "500": detail_response("A prompt step failed")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "AnalysisRequest": {
                    "type": "object",
                    "required": ["company_name"],
                    "properties": {
                        "company_name": { "type": "string" },
                        "industry": { "type": "string", "nullable": true },
                        "include_loyalty_program": { "type": "boolean", "default": true }
                    }
                },
                "CompetitorBreakdown": {
                    "type": "object",
                    "properties": {
                        "company_name": { "type": "string" },
                        "industry": { "type": "string", "nullable": true },
                        "main_competitors": { "type": "array", "items": { "type": "string" } },
                        "competitor_details": { "type": "string" },
                        "comparative_analysis": { "type": "string" },
                        "analysis_includes_loyalty": { "type": "boolean" }
                    }
                },
                "Positioning": {
                    "type": "object",
                    "properties": {
                        "company_name": { "type": "string" },
                        "industry": { "type": "string", "nullable": true },
                        "competitors_analysis": { "type": "string" },
                        "company_positioning": { "type": "string" },
                        "analysis_includes_loyalty": { "type": "boolean" }
                    }
                },
                "ErrorDetail": {
                    "type": "object",
                    "properties": { "detail": { "type": "string" } }
                }
            }
        }
    })
}
