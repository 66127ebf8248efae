#![deny(missing_docs)]

//! # Templates
//!
//! The initial contents of every generated file, as a name-to-text map built
//! once at startup and injected into the commands. Rendering is plain
//! `{{placeholder}}` substitution; the registry and app-main templates are
//! the files the mutation engine later parses and extends, so their text must
//! stay inside the engine's grammar.

use std::collections::HashMap;

use goforge_core::{AppError, AppResult};

const GO_MOD: &str = r#"module {{project}}

go 1.19

require (
	github.com/gin-gonic/gin v1.8.1
	github.com/goforge-dev/framework v0.1.0
	go.uber.org/dig v1.15.0
)
"#;

const GITIGNORE: &str = r#"# Binaries for programs and plugins
*.exe
*.exe~
*.dll
*.so
*.dylib
*.test
*.out
.idea/
"#;

/// `internal/main.go`: holds the import-list and string-keyed-registry
/// anchors that `create-app` extends.
const REGISTRY_MAIN: &str = r#"package main

import (
	"log"
	"sync"
)

// AppRunner defines the interface for a runnable application.
type AppRunner interface {
	Run()
}

func main() {
	apps := map[string]AppRunner{}

	var wg sync.WaitGroup

	if len(apps) == 0 {
		log.Println("No applications to run. Use 'goforge create-app <app-name>' to create one.")
		return
	}

	for name, app := range apps {
		wg.Add(1)

		go func(appName string, runner AppRunner) {
			defer wg.Done()
			log.Printf("Starting application: %s", appName)
			runner.Run()
		}(name, app)
	}

	log.Println("All applications are starting...")
	wg.Wait()
	log.Println("All applications have been shut down.")
}
"#;

/// Per-app `core` shim re-exporting the framework locally.
const CORE_SHIM: &str = r#"package core

import (
	"github.com/goforge-dev/framework/pkg/framework"
)

// Re-export the framework types to make them local to the app.
type App = framework.App

type Module = framework.Module

var New = framework.New
"#;

/// `<app>_main.go`: holds the import-list and `core.New` call anchors that
/// `create-module` extends.
const APP_MAIN: &str = r#"package {{app}}

import (
	"{{project}}/internal/{{app}}/core"
)

// App struct holds the application instance.
type App struct{}

// Run initializes and starts the web application.
func (a App) Run() {
	// TODO: Make port configurable
	port := ":8081"

	app := core.New()

	app.Start(port)
}
"#;

const MODULE: &str = r#"package {{module}}

import (
	"{{project}}/internal/{{app}}/core"
	"go.uber.org/dig"
)

// {{Module}}Module implements the framework.Module interface.
type {{Module}}Module struct{}

// Register provides the components of this module to the dependency injection container.
func (m {{Module}}Module) Register(container *dig.Container) error {
	if err := container.Provide(New{{Module}}Service); err != nil {
		return err
	}

	if err := container.Provide(New{{Module}}Controller); err != nil {
		return err
	}

	return nil
}
"#;

const SERVICE: &str = r#"package {{module}}

import (
	"log"
)

// {{Module}}Service defines the business logic for the {{module}} module.
type {{Module}}Service struct {
	// Add dependencies here, e.g., a database connection
}

// New{{Module}}Service creates a new service instance.
func New{{Module}}Service() *{{Module}}Service {
	return &{{Module}}Service{}
}

// ExampleMethod is an example of a service method.
func (s *{{Module}}Service) ExampleMethod() string {
	log.Println("{{Module}}Service: ExampleMethod called")
	return "Hello from {{Module}}Service!"
}
"#;

const CONTROLLER: &str = r#"package {{module}}

import (
	"net/http"

	"github.com/gin-gonic/gin"
)

// {{Module}}Controller handles the HTTP requests for the {{module}} module.
type {{Module}}Controller struct {
	service *{{Module}}Service
}

// New{{Module}}Controller creates a new controller with its dependencies.
func New{{Module}}Controller(service *{{Module}}Service) *{{Module}}Controller {
	return &{{Module}}Controller{service: service}
}

// RegisterRoutes sets up the routes for this controller.
func (c *{{Module}}Controller) RegisterRoutes(router *gin.RouterGroup) {
	router.GET("/", c.GetExample)
}

// GetExample is an example handler function.
func (c *{{Module}}Controller) GetExample(ctx *gin.Context) {
	message := c.service.ExampleMethod()
	ctx.JSON(http.StatusOK, gin.H{"message": message})
}
"#;

/// The injected template set.
#[derive(Debug, Clone)]
pub struct Templates {
    map: HashMap<&'static str, &'static str>,
}

impl Templates {
    /// The templates compiled into the binary.
    pub fn builtin() -> Self {
        let mut map = HashMap::new();
        map.insert("go.mod", GO_MOD);
        map.insert("gitignore", GITIGNORE);
        map.insert("registry_main", REGISTRY_MAIN);
        map.insert("core_shim", CORE_SHIM);
        map.insert("app_main", APP_MAIN);
        map.insert("module", MODULE);
        map.insert("service", SERVICE);
        map.insert("controller", CONTROLLER);
        Templates { map }
    }

    /// Renders the named template, substituting every `{{key}}` placeholder.
    pub fn render(&self, name: &str, vars: &[(&str, &str)]) -> AppResult<String> {
        let text = self
            .map
            .get(name)
            .ok_or_else(|| AppError::General(format!("unknown template: {}", name)))?;
        let mut out = (*text).to_string();
        for (key, value) in vars {
            out = out.replace(&format!("{{{{{}}}}}", key), value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_substitutes_placeholders() {
        let templates = Templates::builtin();
        let out = templates
            .render("go.mod", &[("project", "shop")])
            .unwrap();
        assert!(out.starts_with("module shop\n"));
        assert!(!out.contains("{{"));
    }

    #[test]
    fn test_unknown_template_is_error() {
        let templates = Templates::builtin();
        assert!(templates.render("nope", &[]).is_err());
    }

    #[test]
    fn test_registry_template_is_parseable_by_engine() {
        let templates = Templates::builtin();
        let out = templates.render("registry_main", &[]).unwrap();
        goforge_core::parse(&out).expect("registry template must stay inside the engine grammar");
    }

    #[test]
    fn test_app_main_template_is_parseable_by_engine() {
        let templates = Templates::builtin();
        let out = templates
            .render("app_main", &[("project", "shop"), ("app", "store")])
            .unwrap();
        goforge_core::parse(&out).expect("app main template must stay inside the engine grammar");
    }

    #[test]
    fn test_module_templates_are_parseable_by_engine() {
        let templates = Templates::builtin();
        let vars = [
            ("project", "shop"),
            ("app", "store"),
            ("module", "billing"),
            ("Module", "Billing"),
        ];
        for name in ["module", "service", "controller", "core_shim"] {
            let out = templates.render(name, &vars).unwrap();
            goforge_core::parse(&out)
                .unwrap_or_else(|e| panic!("template {} must parse: {}", name, e));
        }
    }
}
