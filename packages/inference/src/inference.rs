use crate::collector::VariableCollector;
use crate::error::{InferenceError, InferenceResult};
use crate::naming::to_struct_name;
use crate::options::InferenceOptions;
use crate::types::{FieldSource, Schema, StructField};
use htmlc_parser::ast::*;
use htmlc_parser::{serialize_pipeline, unquote, PARAM_MARKER};
use tracing::{debug, instrument};

/// Walks a template syntax tree and builds the schema of the variables it reads
pub struct InferenceEngine {
    options: InferenceOptions,
}

impl InferenceEngine {
    pub fn new(options: InferenceOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InferenceOptions {
        &self.options
    }

    /// Infer the schema of a node list under the given name
    #[instrument(skip(self, tree))]
    pub fn infer(&self, schema_name: &str, tree: &ListNode) -> InferenceResult<Schema> {
        self.infer_named(schema_name, schema_name, tree)
    }

    /// Infer the schema of a definition; the schema is named after it
    pub fn infer_definition(&self, definition: &Definition) -> InferenceResult<Schema> {
        self.infer_named(
            &to_struct_name(&definition.name),
            &definition.name,
            &definition.body,
        )
    }

    fn infer_named(
        &self,
        schema_name: &str,
        template: &str,
        tree: &ListNode,
    ) -> InferenceResult<Schema> {
        let mut walk = Walk {
            options: &self.options,
            template,
            collector: VariableCollector::new(&self.options),
        };
        walk.list(tree)?;

        let schema = walk.collector.finish(schema_name, template);
        debug!(
            schema = %schema.name,
            fields = schema.fields.len(),
            imports = schema.imports.len(),
            "inferred schema"
        );
        Ok(schema)
    }
}

impl Default for InferenceEngine {
    fn default() -> Self {
        Self::new(InferenceOptions::default())
    }
}

/// Infer a schema with the default options
pub fn infer(schema_name: &str, tree: &ListNode) -> InferenceResult<Schema> {
    InferenceEngine::default().infer(schema_name, tree)
}

struct Walk<'a> {
    options: &'a InferenceOptions,
    template: &'a str,
    collector: VariableCollector<'a>,
}

impl<'a> Walk<'a> {
    fn list(&mut self, list: &ListNode) -> InferenceResult<()> {
        for node in &list.nodes {
            self.node(node)?;
        }
        Ok(())
    }

    fn node(&mut self, node: &Node) -> InferenceResult<()> {
        match node {
            Node::Action { pipe, .. } => self.pipeline(pipe),

            Node::If(branch) => {
                self.pipeline(&branch.pipe)?;
                self.list(&branch.list)?;
                if let Some(else_list) = &branch.else_list {
                    self.list(else_list)?;
                }
                Ok(())
            }

            // The body runs with a different dot; only the outer parts read
            // the template's own data
            Node::Range(branch) | Node::With(branch) => {
                self.pipeline(&branch.pipe)?;
                if let Some(else_list) = &branch.else_list {
                    self.list(else_list)?;
                }
                Ok(())
            }

            Node::Template { pipe, .. } => match pipe {
                Some(pipe) => self.pipeline(pipe),
                None => Ok(()),
            },

            Node::Text { .. } | Node::Comment { .. } | Node::Break { .. } | Node::Continue { .. } => {
                Ok(())
            }
        }
    }

    fn pipeline(&mut self, pipe: &Pipeline) -> InferenceResult<()> {
        for cmd in &pipe.cmds {
            if cmd.function_name() == Some(PARAM_MARKER) && cmd.args.len() >= 3 {
                self.annotation(cmd)?;
                continue;
            }
            for arg in &cmd.args {
                self.arg(arg)?;
            }
        }
        Ok(())
    }

    fn annotation(&mut self, cmd: &Command) -> InferenceResult<()> {
        let name = self.string_arg(&cmd.args[1])?;
        let type_ = self.string_arg(&cmd.args[2])?;
        debug!(template = self.template, %name, %type_, "found annotation");

        self.collector.on_variable_found(
            StructField::new(&name, type_, FieldSource::Annotation),
            true,
        );
        Ok(())
    }

    fn string_arg(&self, arg: &Arg) -> InferenceResult<String> {
        match arg {
            Arg::String { quoted, .. } => unquote(quoted)
                .map_err(|e| InferenceError::annotation_decode(self.template, e.to_string())),
            Arg::Pipeline(pipe) => Err(InferenceError::annotation_decode(
                self.template,
                format!("expected string constant, found ({})", serialize_pipeline(pipe)),
            )),
            other => Err(InferenceError::annotation_decode(
                self.template,
                format!("expected string constant at offset {}", other.span().start),
            )),
        }
    }

    fn arg(&mut self, arg: &Arg) -> InferenceResult<()> {
        match arg {
            Arg::Field { idents, .. } => {
                for ident in idents {
                    self.collector.on_variable_found(
                        StructField::new(ident, self.options.default_type.clone(), FieldSource::Usage),
                        false,
                    );
                }
                Ok(())
            }
            Arg::Pipeline(pipe) => self.pipeline(pipe),
            Arg::Chain { node, .. } => self.arg(node),
            Arg::Identifier { .. }
            | Arg::Variable { .. }
            | Arg::Dot { .. }
            | Arg::Nil { .. }
            | Arg::Bool { .. }
            | Arg::Number { .. }
            | Arg::String { .. } => Ok(()),
        }
    }
}
