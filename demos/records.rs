use oasmodel::loader::{self, DocumentFormat};
use oasmodel::openapi::{
    Info, OpenApi, Operation, Parameter, ParameterLocation, PathItem, Server, ServerVariable,
};
use oasmodel::validator::DocumentValidator;

fn records_document() -> OpenApi {
    let mut document = OpenApi::new("3.0.0", Info::new("myapi", "1.0"));

    let mut production = Server::new("https://api.example.org");
    production.description = Some(String::from("This is the production api"));
    production.variables.insert(
        String::from("some"),
        ServerVariable {
            enumeration: Some(vec![String::from("100"), String::from("200")]),
            default: String::from("100"),
            description: Some(String::from("some number")),
            ..Default::default()
        },
    );
    document.servers = vec![Server::new("http://testapi.example.org"), production];

    let item = PathItem {
        description: Some(String::from("this is the gets records")),
        summary: Some(String::from("This path does something very cool")),
        get: Some(Operation {
            tags: vec![String::from("tag1")],
            summary: Some(String::from("this is a summary")),
            deprecated: Some(true),
            operation_id: Some(String::from("someid")),
            parameters: vec![Parameter::new("param1", ParameterLocation::Cookie).into()],
            ..Default::default()
        }),
        ..Default::default()
    };
    document.paths.insert("/records", item);
    document
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = records_document();
    print!("{}", loader::render(&document, DocumentFormat::Yaml)?);

    let report = DocumentValidator::new().validate(&document);
    eprintln!("{}", report);
    Ok(())
}
