use crate::error::GenerationError;
use crate::metadata::{BindingDescriptor, FunctionMetadataRecord, RetryPolicy};
use crate::pipeline::CancellationToken;
use std::fmt::Write;
use tracing::debug;

pub const PROVIDER_CLASS: &str = "GeneratedMapActionFunctionMetadataProvider";
pub const EXTENSION_CLASS: &str = "WorkerHostBuilderMapActionFunctionMetadataProviderExtension";
pub const EXTENSION_METHOD: &str = "ConfigureGeneratedMapActionFunctionMetadataProvider";
pub const AUTO_STARTUP_CLASS: &str = "MapActionFunctionMetadataProviderAutoStartup";

const USINGS: [&str; 9] = [
    "System",
    "System.Collections.Generic",
    "System.Collections.Immutable",
    "System.Text.Json",
    "System.Threading.Tasks",
    "Microsoft.Azure.Functions.Worker",
    "Microsoft.Azure.Functions.Worker.Core.FunctionMetadata",
    "Microsoft.Extensions.DependencyInjection",
    "Microsoft.Extensions.Hosting",
];

const BODY_INDENT: &str = "            ";
const FIELD_INDENT: &str = "                ";
const RETRY_INDENT: &str = "                    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    pub namespace: String,
    pub auto_register: bool,
}

impl EmitOptions {
    pub fn new(namespace: impl Into<String>, auto_register: bool) -> Self {
        Self {
            namespace: namespace.into(),
            auto_register,
        }
    }
}

/// Renders the provider source for `records`
///
/// Output depends only on the records, their order and the options. Variable
/// names come from each record's `call_site`, which the extractor assigns
/// uniquely; call sites excluded upstream leave gaps in the numbering.
pub fn execute(
    records: &[FunctionMetadataRecord],
    options: &EmitOptions,
    cancellation: &CancellationToken,
) -> Result<String, GenerationError> {
    let mut functions = String::new();
    for record in records {
        cancellation.check()?;
        render_function(&mut functions, record)?;
    }

    let mut out = String::new();
    out.push_str("// <auto-generated/>\n");
    for using in USINGS {
        writeln!(out, "using {};", using)?;
    }
    out.push('\n');

    writeln!(out, "namespace {}", options.namespace)?;
    out.push_str("{\n");
    render_provider(&mut out, &functions)?;
    out.push('\n');
    render_extension(&mut out)?;
    if options.auto_register {
        out.push('\n');
        render_auto_startup(&mut out)?;
    }
    out.push_str("}\n");

    debug!(
        functions = records.len(),
        bytes = out.len(),
        auto_register = options.auto_register,
        "Rendered metadata provider"
    );
    Ok(out)
}

fn render_provider(out: &mut String, functions: &str) -> Result<(), GenerationError> {
    out.push_str("    /// <summary>\n");
    out.push_str("    /// Custom <see cref=\"IFunctionMetadataProvider\"/> implementation that returns function metadata definitions for the current worker.\n");
    out.push_str("    /// </summary>\n");
    out.push_str("    [global::System.ComponentModel.EditorBrowsableAttribute(global::System.ComponentModel.EditorBrowsableState.Never)]\n");
    out.push_str("    [global::System.Runtime.CompilerServices.CompilerGeneratedAttribute()]\n");
    writeln!(out, "    public class {} : IFunctionMetadataProvider", PROVIDER_CLASS)?;
    out.push_str("    {\n");
    out.push_str("        /// <inheritdoc/>\n");
    out.push_str("        public Task<ImmutableArray<IFunctionMetadata>> GetFunctionMetadataAsync(string directory)\n");
    out.push_str("        {\n");
    writeln!(out, "{}var metadataList = new List<IFunctionMetadata>();", BODY_INDENT)?;
    out.push_str(functions);
    writeln!(out, "{}return Task.FromResult(metadataList.ToImmutableArray());", BODY_INDENT)?;
    out.push_str("        }\n");
    out.push_str("    }\n");
    Ok(())
}

fn render_function(out: &mut String, record: &FunctionMetadataRecord) -> Result<(), GenerationError> {
    let index = record.call_site;
    let variable = function_variable(index);
    let bindings_variable = bindings_variable(index);

    writeln!(out, "{}var {} = new List<string>();", BODY_INDENT, bindings_variable)?;
    for binding in &record.bindings {
        writeln!(
            out,
            "{}{}.Add(@\"{}\");",
            BODY_INDENT,
            bindings_variable,
            binding_literal(binding)?
        )?;
    }

    writeln!(out, "{}var {} = new DefaultFunctionMetadata", BODY_INDENT, variable)?;
    writeln!(out, "{}{{", BODY_INDENT)?;
    writeln!(out, "{}Language = \"{}\",", FIELD_INDENT, record.language)?;
    writeln!(out, "{}Name = {},", FIELD_INDENT, name_literal(index, record.name.as_deref()))?;
    writeln!(out, "{}EntryPoint = \"{}\",", FIELD_INDENT, record.entry_point)?;
    writeln!(out, "{}RawBindings = {},", FIELD_INDENT, bindings_variable)?;
    render_retry(out, &record.retry)?;
    writeln!(out, "{}ScriptFile = {}", FIELD_INDENT, csharp_string(&record.script_file))?;
    writeln!(out, "{}}};", BODY_INDENT)?;
    writeln!(out, "{}metadataList.Add({});", BODY_INDENT, variable)?;
    Ok(())
}

fn render_retry(out: &mut String, retry: &RetryPolicy) -> Result<(), GenerationError> {
    let (max_retry_count, intervals) = match retry {
        RetryPolicy::None => return Ok(()),
        RetryPolicy::FixedDelay {
            max_retry_count, ..
        }
        | RetryPolicy::ExponentialBackoff {
            max_retry_count, ..
        } => (*max_retry_count, retry.intervals()),
    };

    writeln!(out, "{}Retry = new DefaultRetryOptions", FIELD_INDENT)?;
    writeln!(out, "{}{{", FIELD_INDENT)?;
    write!(out, "{}MaxRetryCount = {}", RETRY_INDENT, max_retry_count)?;
    for (field, literal) in intervals {
        write!(
            out,
            ",\n{}{} = TimeSpan.Parse({})",
            RETRY_INDENT,
            field,
            csharp_string(literal)
        )?;
    }
    out.push('\n');
    writeln!(out, "{}}},", FIELD_INDENT)?;
    Ok(())
}

fn render_extension(out: &mut String) -> Result<(), GenerationError> {
    out.push_str("    /// <summary>\n");
    out.push_str("    /// Extension methods to enable registration of the custom <see cref=\"IFunctionMetadataProvider\"/> implementation generated for the current worker.\n");
    out.push_str("    /// </summary>\n");
    writeln!(out, "    public static class {}", EXTENSION_CLASS)?;
    out.push_str("    {\n");
    out.push_str("        ///<summary>\n");
    writeln!(out, "        /// Adds the {} to the service collection.", PROVIDER_CLASS)?;
    out.push_str("        /// During initialization, the worker will return generated function metadata instead of relying on the Azure Functions host for function indexing.\n");
    out.push_str("        ///</summary>\n");
    writeln!(
        out,
        "        public static IHostBuilder {}(this IHostBuilder builder)",
        EXTENSION_METHOD
    )?;
    out.push_str("        {\n");
    out.push_str("            builder.ConfigureServices(s =>\n");
    out.push_str("            {\n");
    writeln!(
        out,
        "                s.AddSingleton<IFunctionMetadataProvider, {}>();",
        PROVIDER_CLASS
    )?;
    out.push_str("            });\n");
    out.push_str("            return builder;\n");
    out.push_str("        }\n");
    out.push_str("    }\n");
    Ok(())
}

fn render_auto_startup(out: &mut String) -> Result<(), GenerationError> {
    out.push_str("    /// <summary>\n");
    out.push_str("    /// Auto startup class to register the custom <see cref=\"IFunctionMetadataProvider\"/> implementation generated for the current worker.\n");
    out.push_str("    /// </summary>\n");
    out.push_str("    [global::System.ComponentModel.EditorBrowsableAttribute(global::System.ComponentModel.EditorBrowsableState.Never)]\n");
    writeln!(out, "    public class {} : IAutoConfigureStartup", AUTO_STARTUP_CLASS)?;
    out.push_str("    {\n");
    out.push_str("        /// <summary>\n");
    out.push_str("        /// Configures the <see cref=\"IHostBuilder\"/> to use the custom <see cref=\"IFunctionMetadataProvider\"/> implementation generated for the current worker.\n");
    out.push_str("        /// </summary>\n");
    out.push_str("        /// <param name=\"hostBuilder\">The <see cref=\"IHostBuilder\"/> instance to use for service registration.</param>\n");
    out.push_str("        public void Configure(IHostBuilder hostBuilder)\n");
    out.push_str("        {\n");
    writeln!(out, "            hostBuilder.{}();", EXTENSION_METHOD)?;
    out.push_str("        }\n");
    out.push_str("    }\n");
    Ok(())
}

/// `Function<N>` for the call site at scan position `N`; user-chosen names
/// never take part, so they cannot collide
pub fn function_variable(index: usize) -> String {
    format!("Function{}", index)
}

pub fn bindings_variable(index: usize) -> String {
    format!("Function{}RawBindings", index)
}

/// Descriptor JSON as the body of a verbatim string: `"` becomes `""`
pub fn binding_literal(binding: &BindingDescriptor) -> Result<String, GenerationError> {
    Ok(binding.to_json()?.replace('"', "\"\""))
}

/// Function name as a C# string literal
///
/// Path separators are stripped. A missing name falls back to the positional
/// variable name so it stays unique.
pub fn name_literal(index: usize, name: Option<&str>) -> String {
    match name {
        Some(name) => csharp_string(&name.replace('/', "")),
        None => csharp_string(&function_variable(index)),
    }
}

/// Regular (non-verbatim) C# string literal
pub fn csharp_string(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}
